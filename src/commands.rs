use crate::Registry;
use crate::input::Keyword;
use crate::store::StoreError;
use async_trait::async_trait;
use coursereg_core::{Course, RegistrationForm};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod load;
mod register;

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A fully decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the courses of a session
    Load(String),
    /// Persist a registration form
    Register(RegistrationForm),
}

impl Command {
    pub fn keyword(&self) -> Keyword {
        match self {
            Command::Load(_) => Keyword::Load,
            Command::Register(_) => Keyword::Register,
        }
    }
}

/// Value written back to the client. Serializes as a bare JSON array or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Courses(Vec<Course>),
    Confirmation(String),
}

/// Command context passed to command handlers
pub struct CmdCtx {
    /// Stores, config and the dispatch table
    pub registry: Arc<Registry>,
    /// Connection this command arrived on
    pub conn_id: Uuid,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handles one command. Returning `None` means this handler has nothing to send.
    async fn run(&self, ctx: Arc<CmdCtx>, command: &Command) -> CommandResult<Option<Reply>>;
}

/// Serves both protocol commands against the registry stores.
pub struct Registrar;

#[async_trait]
impl CommandHandler for Registrar {
    async fn run(&self, ctx: Arc<CmdCtx>, command: &Command) -> CommandResult<Option<Reply>> {
        let reply = match command {
            Command::Load(session) => load::load(ctx, session).await?,
            Command::Register(form) => register::register(ctx, form).await?,
        };
        Ok(Some(reply))
    }
}

/// Ordered keyword -> handler table, built once when the server starts.
#[derive(Clone, Default)]
pub struct Dispatcher {
    bindings: Vec<(Keyword, Arc<dyn CommandHandler>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let registrar: Arc<dyn CommandHandler> = Arc::new(Registrar);
        let mut d = Self::new();
        d.bind(Keyword::Load, registrar.clone());
        d.bind(Keyword::Register, registrar);
        d
    }

    /// Adds a handler after any already bound to `keyword`.
    pub fn bind(&mut self, keyword: Keyword, handler: Arc<dyn CommandHandler>) -> &mut Self {
        self.bindings.push((keyword, handler));
        self
    }

    pub fn handles(&self, keyword: Keyword) -> bool {
        self.bindings.iter().any(|(k, _)| *k == keyword)
    }

    /// Runs every handler bound to the command's keyword, in binding order, and
    /// collects their replies. Stops at the first handler error.
    pub async fn dispatch(&self, ctx: Arc<CmdCtx>, command: &Command) -> CommandResult<Vec<Reply>> {
        let keyword = command.keyword();
        let mut replies = Vec::new();

        for (_, handler) in self.bindings.iter().filter(|(k, _)| *k == keyword) {
            if let Some(reply) = handler.run(ctx.clone(), command).await? {
                replies.push(reply);
            }
        }

        Ok(replies)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.bindings.iter().map(|(k, _)| k)).finish()
    }
}
