//! User Profile
//!
//! Identidade e interesses do usuário, persistidos em um único documento JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::errors::{Result, TechdeskError};

/// Perfil do usuário
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub stack: Vec<String>,
    pub interests: Vec<String>,
}

/// Store com um único escritor, sem locking
pub struct ProfileStore {
    path: PathBuf,
    pub profile: UserProfile,
}

impl ProfileStore {
    /// Abre o store no caminho padrão de dados
    pub fn open_default() -> Self {
        Self::open(config::profile_path())
    }

    /// Abre o store no caminho dado, carregando o perfil se existir.
    ///
    /// Arquivo ausente vira defaults vazios silenciosamente; erros de I/O ou
    /// parse degradam pra defaults e vão pro log.
    pub fn open(path: PathBuf) -> Self {
        let profile = match load_from(&path) {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::default(),
            Err(err) => {
                tracing::warn!("error loading profile: {err}");
                UserProfile::default()
            }
        };

        Self { path, profile }
    }

    /// Persiste o perfil completo, criando diretórios pai se necessário
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TechdeskError::FileError {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(&self.profile)
            .map_err(|e| TechdeskError::SerializationError(e.to_string()))?;

        fs::write(&self.path, content).map_err(|e| TechdeskError::FileError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Sobrescreve apenas os campos fornecidos e persiste imediatamente.
    ///
    /// Falha ao salvar não desfaz a atualização em memória, só vai pro log.
    pub fn update(
        &mut self,
        name: Option<String>,
        stack: Option<Vec<String>>,
        interests: Option<Vec<String>>,
    ) {
        if let Some(name) = name {
            self.profile.name = name;
        }
        if let Some(stack) = stack {
            self.profile.stack = stack;
        }
        if let Some(interests) = interests {
            self.profile.interests = interests;
        }

        if let Err(err) = self.save() {
            tracing::warn!("error saving profile: {err}");
        }
    }
}

fn load_from(path: &Path) -> Result<Option<UserProfile>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| TechdeskError::FileError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let profile = serde_json::from_str(&content)
        .map_err(|e| TechdeskError::SerializationError(e.to_string()))?;

    Ok(Some(profile))
}
