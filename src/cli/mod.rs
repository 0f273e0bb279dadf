//! # Command-Line Interface
//!
//! User-facing commands over the document engine.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `new` | Create a document file |
//! | `show` | Print a document's state and events |
//! | `event add` / `event remove` | Edit a document's events |
//! | `sort` | Sort a document's events by year |
//! | `recent` | List recently used documents |
//!
//! Config lives at the platform config directory; `--config` (or
//! `CHRONICA_CONFIG`) points at an alternate file.
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;

pub use app::{run, Cli, Commands, EventCommands};
