// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: DB/session/file-server adapters
// - presentation: HTTP handlers and routing
// - application: ports, identity rules and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;
