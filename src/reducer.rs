use crate::error::{ReduceError, Result};
use crate::event::PrimitiveEvent;
use crate::file_pass;
use crate::folder_pass;
use crate::history::History;
use crate::index::HashIndex;
use crate::store::EventStore;
use log::debug;

/// Knobs for a reduction pass.
///
/// Build one with [`Reducer::builder`]; the defaults reproduce the plain
/// strict-adjacency reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ReducerConfig {
    /// Fail on a file delete with no live index entry instead of logging it.
    ///
    /// Off by default: a batch is usually a slice of a longer history and
    /// may delete files created before it started.
    pub strict_index: bool,

    /// Narrate a create whose hash is already live elsewhere as a copy.
    pub detect_copies: bool,

    /// Run the folder pass (delete collapsing, folder moves) in
    /// [`Reducer::finish`].
    pub fold_folders: bool,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        ReducerConfig {
            strict_index: false,
            detect_copies: true,
            fold_folders: true,
        }
    }
}

/// Builder for configuring a [`Reducer`].
///
/// # Examples
///
/// ```
/// use fsfold::Reducer;
///
/// let reducer = Reducer::builder()
///     .strict_index(true)
///     .detect_copies(false)
///     .build();
/// assert!(reducer.config().strict_index);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReducerBuilder {
    config: ReducerConfig,
}

impl ReducerBuilder {
    /// See [`ReducerConfig::strict_index`].
    pub fn strict_index(mut self, strict: bool) -> Self {
        self.config.strict_index = strict;
        self
    }

    /// See [`ReducerConfig::detect_copies`].
    pub fn detect_copies(mut self, detect: bool) -> Self {
        self.config.detect_copies = detect;
        self
    }

    /// See [`ReducerConfig::fold_folders`].
    pub fn fold_folders(mut self, fold: bool) -> Self {
        self.config.fold_folders = fold;
        self
    }

    /// Create an empty [`Reducer`] with this configuration.
    pub fn build(self) -> Reducer {
        Reducer::with_config(self.config)
    }
}

/// Folds a timestamp-ordered batch of primitive events into a history.
///
/// Owns the event store and hash index for one pass. Feed it with
/// [`ingest`](Reducer::ingest), then call [`finish`](Reducer::finish) to run
/// the folder pass and take the history.
///
/// Once an ingest fails the reducer is poisoned: later ingests and
/// `finish` return the same error, so a half-reduced history never escapes.
///
/// # Examples
///
/// ```
/// use fsfold::{Change, ContentHash, ObjectPath, PrimitiveEvent, Reducer};
///
/// let path = |p: &str| ObjectPath::parse(p).unwrap();
/// let hash = Some(ContentHash::new("2222"));
///
/// let mut reducer = Reducer::new();
/// reducer.ingest(PrimitiveEvent::delete(1, path("/a/c.t"), hash.clone())).unwrap();
/// reducer.ingest(PrimitiveEvent::create(2, path("/a/d.t"), hash)).unwrap();
///
/// let history = reducer.finish().unwrap();
/// assert_eq!(history.len(), 1);
/// assert!(history.events()[0].change.is_rename());
/// ```
#[derive(Debug, Default)]
pub struct Reducer {
    store: EventStore,
    index: HashIndex,
    config: ReducerConfig,
    failed: Option<ReduceError>,
}

impl Reducer {
    /// A reducer with the default configuration.
    pub fn new() -> Self {
        Reducer::default()
    }

    /// Start configuring a reducer.
    pub fn builder() -> ReducerBuilder {
        ReducerBuilder::default()
    }

    pub fn with_config(config: ReducerConfig) -> Self {
        Reducer {
            config,
            ..Reducer::default()
        }
    }

    /// Reduce one primitive event against everything ingested so far.
    ///
    /// # Errors
    ///
    /// See [`file_pass::ingest`](crate::file_pass::ingest). Any error
    /// poisons the reducer.
    pub fn ingest(&mut self, event: PrimitiveEvent) -> Result<()> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = file_pass::ingest(&mut self.store, &mut self.index, event, &self.config);
        if let Err(err) = &result {
            self.failed = Some(err.clone());
        }
        result
    }

    /// Ingest every event in order, stopping at the first error.
    pub fn ingest_all<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = PrimitiveEvent>,
    {
        for event in events {
            self.ingest(event)?;
        }
        Ok(())
    }

    /// Events reduced so far, before the folder pass.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// The live hash index.
    pub fn index(&self) -> &HashIndex {
        &self.index
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Run the folder pass and hand over the final history.
    ///
    /// # Errors
    ///
    /// Returns the error that poisoned the reducer, if any.
    pub fn finish(mut self) -> Result<History> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        if self.config.fold_folders {
            let before = self.store.len();
            folder_pass::simplify_folders(&mut self.store);
            debug!(
                "folder pass: {before} events reduced to {}",
                self.store.len()
            );
        }
        Ok(History::new(self.store.into_events()))
    }
}

/// Reduce a whole batch with the default configuration.
///
/// ```
/// use fsfold::{feed, reduce};
///
/// let events = feed::parse_batch("DEL 1 /f/x.t 4444\nADD 2 /f/y.t 4444\n").unwrap();
/// let history = reduce(events).unwrap();
/// assert_eq!(history.narrate(), ["Renamed the file \"x.t\" in the folder \"/f\" to \"y.t\"."]);
/// ```
pub fn reduce<I>(events: I) -> Result<History>
where
    I: IntoIterator<Item = PrimitiveEvent>,
{
    let mut reducer = Reducer::new();
    reducer.ingest_all(events)?;
    reducer.finish()
}
