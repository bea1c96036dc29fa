// SPDX-License-Identifier: MIT OR Apache-2.0
//! Default pin allocation for each node kind.

use crate::catalog::{ClassDef, FunctionDef, ParamDef, StructDef};
use ordoplay_blueprint_graph::{ClassRef, Pin, PinCategory, PinDirection, PinType, StructRef};

/// Exec input
pub const EXEC_INPUT: &str = "Execute";
/// Exec output
pub const EXEC_OUTPUT: &str = "Then";
/// Target object input of member calls, and the output of self nodes
pub const SELF_PIN: &str = "self";
/// Return value output
pub const RETURN_VALUE: &str = "ReturnValue";
/// Delegate output of event nodes
pub const DELEGATE_OUTPUT: &str = "OutputDelegate";
/// Delegate input of assign-delegate nodes
pub const DELEGATE_INPUT: &str = "Delegate";
/// Exec output taken when a cast fails
pub const CAST_FAILED: &str = "CastFailed";
/// Object input of cast nodes
pub const CAST_OBJECT: &str = "Object";

fn exec_in() -> Pin {
    Pin::input(EXEC_INPUT, PinType::exec())
}

fn exec_out() -> Pin {
    Pin::output(EXEC_OUTPUT, PinType::exec())
}

/// Name without its conventional one-letter prefix (`UButton` -> `Button`)
pub fn display_name(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('U' | 'A' | 'F'), Some(second)) if second.is_ascii_uppercase() => &name[1..],
        _ => name,
    }
}

/// Pins of an event node: delegate output, exec output, then one output
/// per signature parameter
pub fn event_pins(signature: &[ParamDef]) -> Vec<Pin> {
    let mut pins = vec![Pin::output(DELEGATE_OUTPUT, PinType::delegate()), exec_out()];
    pins.extend(signature.iter().map(|p| Pin::output(&p.name, p.pin_type.clone())));
    pins
}

/// Pins of a function call node
pub fn function_call_pins(owner: &ClassRef, function: &FunctionDef) -> Vec<Pin> {
    let mut pins = Vec::new();
    if !function.pure {
        pins.push(exec_in());
        pins.push(exec_out());
    }
    if !function.is_static {
        pins.push(Pin::input(SELF_PIN, PinType::object(owner.clone())));
    }
    pins.extend(function.params.iter().map(|p| {
        Pin::new(&p.name, p.direction, p.pin_type.clone()).with_default(&p.default_value)
    }));
    pins
}

/// Pin of a variable or component read
pub fn variable_get_pins(name: &str, pin_type: PinType) -> Vec<Pin> {
    vec![Pin::output(name, pin_type)]
}

/// Pin of a self reference
pub fn self_pins(class: &ClassRef) -> Vec<Pin> {
    vec![Pin::output(SELF_PIN, PinType::object(class.clone()))]
}

/// Pins of an input action event
pub fn input_action_pins() -> Vec<Pin> {
    vec![
        Pin::output("Pressed", PinType::exec()),
        Pin::output("Released", PinType::exec()),
    ]
}

/// Pins of a dynamic cast node
pub fn dynamic_cast_pins(target: &ClassRef) -> Vec<Pin> {
    vec![
        exec_in(),
        exec_out(),
        Pin::output(CAST_FAILED, PinType::exec()),
        Pin::input(CAST_OBJECT, PinType::new(PinCategory::Object)),
        Pin::output(format!("As{}", display_name(&target.name)), PinType::object(target.clone())),
    ]
}

/// Pins of a subsystem getter
pub fn subsystem_getter_pins(subsystem: &ClassRef) -> Vec<Pin> {
    vec![Pin::output(RETURN_VALUE, PinType::object(subsystem.clone()))]
}

/// Pins of a make-struct node: one input per field, then the struct output
/// named after the struct
pub fn make_struct_pins(struct_def: &StructDef) -> Vec<Pin> {
    let mut pins: Vec<Pin> = struct_def
        .fields
        .iter()
        .map(|f| Pin::input(&f.name, f.pin_type.clone()).with_default(&f.default_value))
        .collect();
    pins.push(Pin::output(
        display_name(&struct_def.name),
        PinType::structure(StructRef::new(&struct_def.name, &struct_def.path)),
    ));
    pins
}

/// Pins of an assign-delegate node
pub fn assign_delegate_pins(owner: &ClassDef) -> Vec<Pin> {
    vec![
        exec_in(),
        exec_out(),
        Pin::input(SELF_PIN, PinType::object(owner.to_ref())),
        Pin::input(DELEGATE_INPUT, PinType::delegate()),
    ]
}

/// Pin type for a variable type name, if supported
pub fn variable_pin_type(type_name: &str) -> Option<PinType> {
    match type_name {
        "Boolean" => Some(PinType::boolean()),
        "Integer" | "Int" => Some(PinType::int()),
        "Float" => Some(PinType::float()),
        "String" => Some(PinType::string()),
        "Vector" => Some(PinType::vector()),
        _ => None,
    }
}

/// Store a string literal on a pin through the generic setter.
///
/// Exec and delegate pins carry no literal; returns `false` for them.
pub fn try_set_default_value(pin: &mut Pin, value: &str) -> bool {
    if pin.direction != PinDirection::Input {
        return false;
    }
    match pin.pin_type.category {
        PinCategory::Exec | PinCategory::Delegate => false,
        _ => {
            pin.default_value = value.to_string();
            true
        }
    }
}
