use std::path::PathBuf;

use directive_lib::{CoreConfig, EditSessions, Headings, Repository};

use crate::{logging::Logger, report::Result};

/// Everything a command needs, built once in `main` and passed down explicitly.
pub struct Context {
    pub repo: Repository,
    pub headings: Headings,
    /// Documents currently open in the editor. Lives as long as the context.
    pub sessions: EditSessions,
    pub logger: Logger,
    pub cfg: CoreConfig,
    pub config_path: PathBuf,
}

impl Context {
    pub fn new(cfg: CoreConfig, config_path: PathBuf, logger: Logger) -> Result<Self> {
        let repo = Repository::open(&cfg)?;

        Ok(Self {
            repo,
            headings: cfg.headings.clone(),
            sessions: EditSessions::new(),
            logger,
            cfg,
            config_path,
        })
    }
}
