//! Engine Module
//!
//! Validates requests and dispatches them against the store.
//!
//! ## Responsibilities
//! - Tokenize and classify raw request text
//! - Turn malformed requests into descriptive responses
//! - Execute GET / PUT / DELETE against the store
//! - Persist the store and signal termination on STOP

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{
    Command, Reply, Request, Response, Separator, DELETE_MISSING, DELETE_OK, GET_MISSING, PUT_OK,
};
use crate::store::{JsonFile, KvStore, Persistence};

/// The request dispatcher
///
/// Methods take `&self`; the store locks internally, so an `Arc<Engine>` can be
/// handed to whichever session is currently being served.
pub struct Engine {
    /// The live key-value map
    store: KvStore,

    /// Where the map is loaded from and saved to
    persistence: Box<dyn Persistence>,

    /// Token splitting rule for incoming requests
    separator: Separator,
}

impl Engine {
    /// Open an engine backed by the JSON file named in `config`
    ///
    /// A missing file starts an empty store; an unreadable one is an error.
    pub fn open(config: &Config) -> Result<Self> {
        let persistence = JsonFile::new(&config.data_file);
        Self::with_persistence(Box::new(persistence), config.separator)
    }

    /// Open an engine over an arbitrary persistence gateway
    pub fn with_persistence(
        persistence: Box<dyn Persistence>,
        separator: Separator,
    ) -> Result<Self> {
        let entries = persistence.load()?;
        tracing::info!(
            "Loaded {} entries from {}",
            entries.len(),
            persistence.location()
        );

        Ok(Self {
            store: KvStore::from_entries(entries),
            persistence,
            separator,
        })
    }

    /// Handle one raw request line end to end
    pub fn handle_request(&self, raw: &str) -> Reply {
        let request = Request::parse(raw, self.separator);
        match request.into_command() {
            Ok(command) => self.execute(command),
            Err(validation) => {
                tracing::debug!("Rejected request {:?}: {:?}", raw, validation);
                Reply::proceed(Response::malformed(validation))
            }
        }
    }

    /// Execute a validated command
    pub fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Get { key } => match self.store.get(&key) {
                Some(value) => Reply::proceed(Response::ok(value)),
                None => Reply::proceed(Response::failure(GET_MISSING)),
            },
            Command::Put { key, value } => {
                self.store.put(key, value);
                Reply::proceed(Response::ok(PUT_OK))
            }
            Command::Delete { key } => {
                if self.store.delete(&key) {
                    Reply::proceed(Response::ok(DELETE_OK))
                } else {
                    Reply::proceed(Response::failure(DELETE_MISSING))
                }
            }
            Command::Stop => self.stop(),
        }
    }

    /// Save the store; only a successful save ends the session
    fn stop(&self) -> Reply {
        let location = self.persistence.location();
        match self.persist() {
            Ok(()) => Reply::stop(Response::ok(format!(
                "Updated {} with latest data.",
                location
            ))),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", location, e);
                Reply::proceed(Response::failure(format!(
                    "Failed to update {}: {}",
                    location, e
                )))
            }
        }
    }

    /// Write a snapshot of the store through the persistence gateway
    pub fn persist(&self) -> Result<()> {
        self.persistence.save(&self.store.snapshot())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }
}
