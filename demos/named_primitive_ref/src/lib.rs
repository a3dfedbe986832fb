pub mod models;

use tessera::{Components, Describe, Registry, RegistryConfig};

use crate::models::{CreateUserBody, ResponseBody, UpdateUserBody};

/// Register every request and response body of the users API and return the
/// resulting components.
pub fn users_components(ref_for_named_primitives: bool) -> tessera::Result<Components> {
    let config = RegistryConfig::default().with_ref_for_named_primitives(ref_for_named_primitives);
    let registry = Registry::new(config);

    for ty in [
        CreateUserBody::describe(),
        UpdateUserBody::describe(),
        ResponseBody::describe(),
    ] {
        let schema = registry.schema(&ty, false, None)?;
        tracing::info!(type_id = %ty, schema_ref = ?schema.ref_path, "registered body");
    }

    Ok(registry.components())
}
