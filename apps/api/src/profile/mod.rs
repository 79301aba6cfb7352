// Profile Loader: aggregates the local profile documents into one corpus and
// reads the two LaTeX templates. Read-only; one bad file never aborts a load.

pub mod loader;

pub use loader::ProfileLoader;
