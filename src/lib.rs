// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod core {
    pub mod config;
    pub mod event;
    pub mod format;
    pub mod link;
    pub mod ports;
}

pub mod application {
    pub mod best_effort;
    pub mod errors;
    pub mod reconcile;
}

pub mod normalize;

pub mod adapters {
    pub mod activecollab;
    pub mod in_memory;
}

pub mod shell;
