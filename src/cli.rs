// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::app::App;
use crate::auth::Session;
use crate::config::AppConfig;
use crate::models::{group::GROUP_TYPE_LDAP, Group, GroupSyncablePatch};
use crate::web::run_web_server;

// === CLI ===

#[derive(Parser)]
#[command(name = "nextgroups")]
#[command(author, version, about = "Группы каталога и их привязки к командам и каналам", long_about = None)]
pub struct Cli {
    /// Путь к config.yaml (по умолчанию $CONFIG_PATH или ./config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Запустить веб-API (по умолчанию)
    Serve {
        /// Адрес для веб-сервера (например, 127.0.0.1:8065)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Выпустить JWT для локальной проверки API
    Token {
        user_id: String,
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Управление группами
    Group {
        #[command(subcommand)]
        cmd: GroupCommand,
    },
    /// Привязки групп к командам и каналам
    Syncable {
        #[command(subcommand)]
        cmd: SyncableCommand,
    },
}

// === Подкоманды ===

#[derive(clap::Subcommand)]
pub enum GroupCommand {
    Create {
        name: String,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        remote_id: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Get { id: String },
    List {
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long)]
        per_page: Option<usize>,
        #[arg(short, long)]
        json: bool,
    },
    Delete { id: String },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum SyncableKind {
    Team,
    Channel,
}

#[derive(clap::Subcommand)]
pub enum SyncableCommand {
    List {
        group_id: String,
        #[arg(value_enum)]
        kind: SyncableKind,
    },
    Link {
        group_id: String,
        #[arg(value_enum)]
        kind: SyncableKind,
        syncable_id: String,
        #[arg(long)]
        auto_add: bool,
    },
    Unlink {
        group_id: String,
        #[arg(value_enum)]
        kind: SyncableKind,
        syncable_id: String,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var_os("CONFIG_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config.yaml"))
    }

    pub async fn run(self, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
        // Локальные команды выполняются от имени администратора системы
        let session = Session::new("cli", config.security.admin_roles.clone());

        match self.command.unwrap_or(Command::Serve { addr: None }) {
            Command::Serve { addr } => {
                let app = App::from_config(&config)?;
                let addr = addr.unwrap_or_else(|| config.web_server.address.clone());
                run_web_server(app, &addr).await?;
            }
            Command::Token { user_id, roles } => {
                let app = App::from_config(&config)?;
                println!("{}", app.keys.issue(&user_id, roles)?);
            }
            Command::Group { cmd } => handle_group(cmd, &App::from_config(&config)?, &session).await?,
            Command::Syncable { cmd } => handle_syncable(cmd, &App::from_config(&config)?, &session).await?,
        }

        Ok(())
    }
}

// === Обработчики ===

async fn handle_group(
    cmd: GroupCommand,
    app: &App,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        GroupCommand::Create { name, display_name, remote_id, description } => {
            let display_name = display_name.unwrap_or_else(|| name.clone());
            let mut group = Group::new(name, display_name, GROUP_TYPE_LDAP.to_string(), remote_id);
            group.description = description;
            let group = app.groups.create(session, Some(group)).await?;
            println!("✅ Группа создана: {} ({})", group.name, group.id);
        }
        GroupCommand::Get { id } => {
            let group = app.groups.get(session, &id).await?;
            println!("{}", serde_json::to_string_pretty(&group)?);
        }
        GroupCommand::List { page, per_page, json } => {
            let groups = app.groups.list(session, page, per_page).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                for group in groups {
                    println!("{} | {} | {}", group.id, group.name, group.remote_id);
                }
            }
        }
        GroupCommand::Delete { id } => {
            app.groups.delete(session, &id).await?;
            println!("✅ Группа удалена: {}", id);
        }
    }
    Ok(())
}

async fn handle_syncable(
    cmd: SyncableCommand,
    app: &App,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SyncableCommand::List { group_id, kind } => {
            let syncables = match kind {
                SyncableKind::Team => app.teams.list_syncables(session, &group_id).await?,
                SyncableKind::Channel => app.channels.list_syncables(session, &group_id).await?,
            };
            for s in syncables {
                println!("{} {} auto_add={}", s.syncable_type, s.syncable_id, s.auto_add);
            }
        }
        SyncableCommand::Link { group_id, kind, syncable_id, auto_add } => {
            let body = Some(GroupSyncablePatch { syncable_id, auto_add });
            let s = match kind {
                SyncableKind::Team => app.teams.create_syncable(session, &group_id, body).await?,
                SyncableKind::Channel => app.channels.create_syncable(session, &group_id, body).await?,
            };
            println!("✅ Группа {} привязана: {} {}", s.group_id, s.syncable_type, s.syncable_id);
        }
        SyncableCommand::Unlink { group_id, kind, syncable_id } => {
            match kind {
                SyncableKind::Team => app.teams.delete_syncable(session, &group_id, &syncable_id).await?,
                SyncableKind::Channel => app.channels.delete_syncable(session, &group_id, &syncable_id).await?,
            }
            println!("✅ Привязка удалена: {}", syncable_id);
        }
    }
    Ok(())
}
