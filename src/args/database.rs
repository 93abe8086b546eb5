use super::types::{Args, DatabaseType};

impl Args {
    /// Cross-field checks clap cannot express.
    ///
    /// # Errors
    ///
    /// Will return `Err` if sqlite is selected without a database file
    pub fn validate(&mut self) -> Result<(), String> {
        if self.db_type == DatabaseType::Sqlite {
            match self.db_name.as_deref() {
                None => return Err("Sqlite needs a database file (--db-name)".to_string()),
                Some(path) if path.as_os_str().is_empty() => {
                    return Err("Sqlite database file name is empty".to_string());
                }
                Some(_) => {}
            }
        }
        if self.bind.trim().is_empty() {
            return Err("Bind address is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn sqlite_requires_a_file() {
        let mut args = Args::parse_from(["rowdy-matchplay", "-d", "sqlite"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn memory_needs_no_file() {
        let mut args = Args::parse_from(["rowdy-matchplay", "-d", "memory", "-p", "9000"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.port, 9000);
    }
}
