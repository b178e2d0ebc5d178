use anyhow::{anyhow, Context as _, Result};
use revmod_application::{ConflictRecipients, NotificationSettings};
use revmod_core::entities::EmailAddress;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "revmod.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";

pub struct Config {
    pub db: Db,
    pub notifications: NotificationSettings,
    pub email: Email,
}

impl Config {
    /// Falls back to the built-in defaults only if no file was
    /// requested explicitly and `revmod.toml` does not exist.
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let raw_config = match file_path {
            Some(file_path) => {
                let file_path = file_path.as_ref();
                log::info!("Load configuration from {}", file_path.display());
                let cfg_string = fs::read_to_string(file_path)
                    .with_context(|| format!("Unable to read {}", file_path.display()))?;
                toml::from_str(&cfg_string)?
            }
            None => match fs::read_to_string(DEFAULT_CONFIG_FILE_NAME) {
                Ok(cfg_string) => {
                    log::info!("Load configuration from {DEFAULT_CONFIG_FILE_NAME}");
                    toml::from_str(&cfg_string)?
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    log::info!("{DEFAULT_CONFIG_FILE_NAME} not found => load default configuration.");
                    raw::Config::default()
                }
                Err(err) => return Err(err.into()),
            },
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            log::debug!("Database URL from {ENV_NAME_DB_URL}: {db_url}");
            cfg.db.conn_sqlite = db_url;
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u32,
    pub conn_timeout: Duration,
}

pub struct Email {
    pub gateway: Option<EmailGateway>,
}

#[derive(Clone)]
pub enum EmailGateway {
    Sendmail {
        sender_address: EmailAddress,
    },
    /// For local testing purposes
    EmailToJsonFile {
        /// File system directory for writing emails into JSON files.
        dir: PathBuf,
    },
}

impl From<raw::ConflictRecipients> for ConflictRecipients {
    fn from(from: raw::ConflictRecipients) -> Self {
        match from {
            raw::ConflictRecipients::Arbiters => Self::Arbiters,
            raw::ConflictRecipients::ArbitersAndSupervisors => Self::ArbitersAndSupervisors,
        }
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            notifications,
            email,
            gateway,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
            connection_timeout,
        } = db.unwrap_or_default();

        if connection_pool_size == 0 {
            return Err(anyhow!("The connection pool must not be empty"));
        }

        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
            conn_timeout: connection_timeout,
        };

        let raw::Notifications {
            enabled,
            conflict_recipients,
        } = notifications.unwrap_or_default();

        let notifications = NotificationSettings {
            enabled,
            conflict_recipients: conflict_recipients.into(),
        };

        let email_gateway = match email.and_then(|m| m.gateway) {
            Some(gw_name) => {
                let toml_name = gw_name.toml_name();
                let gateway = gateway.unwrap_or_default();
                let gw = match gw_name {
                    raw::EmailGateway::Sendmail => {
                        let raw::Sendmail { sender_address } =
                            gateway.sendmail.ok_or_else(|| {
                                anyhow!("Missing {toml_name} gateway configuration")
                            })?;
                        let sender_address = sender_address.parse()?;
                        log::info!("Use sendmail gateway");
                        EmailGateway::Sendmail { sender_address }
                    }
                    raw::EmailGateway::EmailToJsonFile => {
                        let raw::EmailToJsonFile { dir } =
                            gateway.email_to_json_file.ok_or_else(|| {
                                anyhow!("Missing {toml_name} gateway configuration")
                            })?;
                        log::info!("Use JSON file email gateway ({})", dir.display());
                        EmailGateway::EmailToJsonFile { dir }
                    }
                };
                Some(gw)
            }
            None => None,
        };

        let email = Email {
            gateway: email_gateway,
        };

        Ok(Self {
            db,
            notifications,
            email,
        })
    }
}
