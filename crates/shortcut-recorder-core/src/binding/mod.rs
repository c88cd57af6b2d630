#[allow(clippy::module_inception)]
mod binding;
mod chord;
mod committer;
mod store;

pub use {
    binding::Binding,
    chord::{Chord, Modifier},
    committer::BindingCommitter,
    store::{BindingStore, MemoryBindingStore},
};
