// SPDX-License-Identifier: MIT OR Apache-2.0
//! Member variable commands.

use super::payload;
use crate::error::CommandError;
use crate::params::Params;
use crate::resolve::TypeResolver;
use crate::response::Payload;
use crate::schema;
use crate::store::{BlueprintStore, VariableDef};
use serde_json::json;

/// `add_variable`: new member variable of a supported type
pub(crate) fn add_variable(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let variable_name = params.required_str("variable_name")?;
    let variable_type = params.required_str("variable_type")?;
    let is_exposed = params.optional_bool("is_exposed")?.unwrap_or(false);

    let pin_type = schema::variable_pin_type(variable_type).ok_or_else(|| CommandError::UnsupportedType {
        what: "variable type",
        name: variable_type.to_string(),
    })?;

    let blueprint = store.require_mut(graph_id)?;
    if blueprint.variable(variable_name).is_some() {
        return Err(CommandError::AlreadyExists {
            what: "Variable",
            name: variable_name.to_string(),
        });
    }

    blueprint.variables.push(VariableDef {
        name: variable_name.to_string(),
        type_name: variable_type.to_string(),
        pin_type,
        is_exposed,
    });
    blueprint.mark_structurally_modified();

    Ok(payload(json!({
        "variable_name": variable_name,
        "variable_type": variable_type,
    })))
}

#[cfg(test)]
mod tests {
    use crate::coerce::coerce_pin;
    use crate::error::CommandError;
    use crate::resolve::TypeResolver;
    use crate::test_support::Harness;
    use ordoplay_blueprint_graph::Pin;
    use serde_json::json;

    #[test]
    fn test_vector_variable_takes_vector_literal() {
        let mut harness = Harness::new();
        let result = harness.ok(
            "add_variable",
            json!({ "graph_id": "BP_Test", "variable_name": "Spawn", "variable_type": "Vector", "is_exposed": true }),
        );
        assert_eq!(result["variable_type"], "Vector");

        let variable = harness.blueprint("BP_Test").variable("Spawn").unwrap().clone();
        assert!(variable.pin_type.is_vector());
        assert!(variable.is_exposed);

        let mut pin = Pin::input(&variable.name, variable.pin_type);
        coerce_pin(&mut pin, &json!([1, 2, 3]), &TypeResolver::new(&harness.catalog)).unwrap();
        assert_eq!(pin.default_value, "(X=1.000000,Y=2.000000,Z=3.000000)");
    }

    #[test]
    fn test_duplicate_and_unsupported() {
        let mut harness = Harness::new();
        harness.ok("add_variable", json!({ "graph_id": "BP_Test", "variable_name": "Count", "variable_type": "Int" }));
        let err = harness
            .run("add_variable", json!({ "graph_id": "BP_Test", "variable_name": "Count", "variable_type": "Float" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::AlreadyExists { .. }));

        let err = harness
            .run("add_variable", json!({ "graph_id": "BP_Test", "variable_name": "Label", "variable_type": "Text" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedType { .. }));
        assert_eq!(harness.blueprint("BP_Test").variables.len(), 1);
    }

    #[test]
    fn test_unsupported_type_checked_before_blueprint() {
        let mut harness = Harness::new();
        let err = harness
            .run("add_variable", json!({ "graph_id": "BP_Missing", "variable_name": "X", "variable_type": "Rotator" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedType { .. }));
    }
}
