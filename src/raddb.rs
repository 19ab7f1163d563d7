// src/raddb.rs

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rand::{rngs::OsRng, RngCore};

#[derive(Debug)]
pub enum RadDbError {
    Io(std::io::Error),
    Serialization(String),
    Decryption(String),
    Encryption(String),
}

impl From<std::io::Error> for RadDbError {
    fn from(e: std::io::Error) -> Self {
        RadDbError::Io(e)
    }
}

impl std::fmt::Display for RadDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadDbError::Io(e) => write!(f, "IO error: {}", e),
            RadDbError::Serialization(e) => write!(f, "Serialization error: {}", e),
            RadDbError::Decryption(e) => write!(f, "Decryption error: {}", e),
            RadDbError::Encryption(e) => write!(f, "Encryption error: {}", e),
        }
    }
}

impl std::error::Error for RadDbError {}

/// Ключ шифрования (32 байта = 256 бит)
pub type MasterKey = [u8; 32];

/// RadDB: зашифрованная embedded база "ключ → байты".
///
/// Синхронизацию доступа обеспечивает владелец (см. `RadStore`): все
/// изменяющие методы требуют `&mut self`. Изменения попадают на диск
/// только по `flush()`; до этого их можно откатить через `rollback()`.
/// Неудачный `flush()` откатывает их сам.
pub struct RadDB {
    path: Option<PathBuf>,
    cipher: Aes256Gcm,
    entries: HashMap<String, Vec<u8>>,
    /// Прежние значения ключей, изменённых после последнего `flush`
    undo: Vec<(String, Option<Vec<u8>>)>,
}

impl RadDB {
    /// Открыть базу по пути с мастер-ключом
    pub fn open<P: AsRef<Path>>(path: P, key: &MasterKey) -> Result<Self, RadDbError> {
        let mut db = Self {
            path: Some(path.as_ref().to_path_buf()),
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
            entries: HashMap::new(),
            undo: Vec::new(),
        };
        db.load()?;
        Ok(db)
    }

    /// База без файла: для тестов и запуска без `db_path`
    pub fn in_memory(key: &MasterKey) -> Self {
        Self {
            path: None,
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
            entries: HashMap::new(),
            undo: Vec::new(),
        }
    }

    /// Создать новый мастер-ключ (надо сохранить!)
    pub fn generate_key() -> MasterKey {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        key
    }

    fn load(&mut self) -> Result<(), RadDbError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Файла нет → пустая база
        if !path.exists() {
            return Ok(());
        }

        let mut file = OpenOptions::new().read(true).open(path)?;
        let mut encrypted = Vec::new();
        file.read_to_end(&mut encrypted)?;

        if encrypted.is_empty() {
            return Ok(());
        }

        if encrypted.len() < 12 {
            return Err(RadDbError::Decryption("File too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = encrypted.split_at(12);
        let payload = Payload {
            msg: ciphertext,
            aad: &[],
        };

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), payload)
            .map_err(|_| RadDbError::Decryption("AES-GCM decryption failed".to_string()))?;

        self.entries = bincode::deserialize(&plaintext)
            .map_err(|e| RadDbError::Serialization(e.to_string()))?;

        Ok(())
    }

    /// Сохранить данные на диск (для базы в памяти только фиксирует изменения).
    /// При ошибке все изменения после прошлого `flush` откатываются.
    pub fn flush(&mut self) -> Result<(), RadDbError> {
        match self.write_file() {
            Ok(()) => {
                self.undo.clear();
                Ok(())
            }
            Err(e) => {
                self.rollback();
                Err(e)
            }
        }
    }

    /// Отменить изменения, сделанные после последнего успешного `flush`
    pub fn rollback(&mut self) {
        while let Some((key, previous)) = self.undo.pop() {
            match previous {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
    }

    fn write_file(&self) -> Result<(), RadDbError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let plaintext = bincode::serialize(&self.entries)
            .map_err(|e| RadDbError::Serialization(e.to_string()))?;

        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);

        let payload = Payload {
            msg: &plaintext,
            aad: &[],
        };

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), payload)
            .map_err(|_| RadDbError::Encryption("AES-GCM encryption failed".to_string()))?;

        // Пишем во временный файл и переименовываем, чтобы не оставить полузаписанную базу
        let tmp_path = path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        file.write_all(&nonce_bytes)?;
        file.write_all(&ciphertext)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Получить значение по ключу
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Проверить наличие ключа
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Установить значение (без записи на диск)
    pub fn insert(&mut self, key: String, value: Vec<u8>) {
        let previous = self.entries.insert(key.clone(), value);
        self.undo.push((key, previous));
    }

    /// Удалить ключ
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(previous) => {
                self.undo.push((key.to_string(), Some(previous)));
                true
            }
            None => false,
        }
    }
}
