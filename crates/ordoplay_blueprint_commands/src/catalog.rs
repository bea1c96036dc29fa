// SPDX-License-Identifier: MIT OR Apache-2.0
//! Type catalog: the classes, structs and functions available for lookup.
//!
//! The resolver only ever reads a catalog. [`StaticCatalog`] is a plain
//! snapshot that can be built in code, loaded from RON, or taken from the
//! built-in engine set.

use ordoplay_blueprint_graph::types::VECTOR_STRUCT_PATH;
use ordoplay_blueprint_graph::{ClassRef, PinCategory, PinDirection, PinType, StructRef};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base class every subsystem derives from
pub const SUBSYSTEM_CLASS: &str = "USubsystem";

/// Root object class
pub const OBJECT_CLASS: &str = "UObject";

fn input_direction() -> PinDirection {
    PinDirection::Input
}

/// A function parameter, delegate signature parameter or struct field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    /// Parameter name, used as the pin name
    pub name: String,
    /// Parameter type
    pub pin_type: PinType,
    /// Input parameters become input pins on calls, output parameters become
    /// output pins
    #[serde(default = "input_direction")]
    pub direction: PinDirection,
    /// Literal default
    #[serde(default)]
    pub default_value: String,
}

impl ParamDef {
    /// Create an input parameter
    pub fn input(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            pin_type,
            direction: PinDirection::Input,
            default_value: String::new(),
        }
    }

    /// Create an output parameter
    pub fn output(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            direction: PinDirection::Output,
            ..Self::input(name, pin_type)
        }
    }

    /// Set the literal default
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// A member function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// Pure functions have no exec pins
    #[serde(default)]
    pub pure: bool,
    /// Static functions take no target object
    #[serde(default)]
    pub is_static: bool,
}

impl FunctionDef {
    /// Create a function with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            pure: false,
            is_static: false,
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    /// Add a `ReturnValue` output
    pub fn returns(self, pin_type: PinType) -> Self {
        self.param(ParamDef::output("ReturnValue", pin_type))
    }

    /// Mark as pure
    pub fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    /// Mark as static
    pub fn static_fn(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// A multicast delegate property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateDef {
    /// Delegate property name
    pub name: String,
    /// Signature parameters
    #[serde(default)]
    pub params: Vec<ParamDef>,
}

impl DelegateDef {
    /// Create a delegate with an empty signature
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Add a signature parameter
    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }
}

/// A class definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Short name (e.g. `UGameplayStatics`)
    pub name: String,
    /// Full object path (e.g. `/Script/Engine.GameplayStatics`)
    pub path: String,
    /// Short name of the parent class
    #[serde(default)]
    pub super_class: Option<String>,
    /// Functions declared on this class (not inherited ones)
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
    /// Delegates declared on this class
    #[serde(default)]
    pub delegates: Vec<DelegateDef>,
}

impl ClassDef {
    /// Create a root class
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            super_class: None,
            functions: Vec::new(),
            delegates: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    /// Add a function
    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    /// Add a delegate
    pub fn with_delegate(mut self, delegate: DelegateDef) -> Self {
        self.delegates.push(delegate);
        self
    }

    /// Handle stamped onto nodes and pins
    pub fn to_ref(&self) -> ClassRef {
        ClassRef::new(&self.name, &self.path)
    }
}

/// A struct definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    /// Short name (e.g. `FVector`)
    pub name: String,
    /// Full object path (e.g. `/Script/CoreUObject.Vector`)
    pub path: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<ParamDef>,
}

impl StructDef {
    /// Create a struct with no fields
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn with_field(mut self, name: impl Into<String>, pin_type: PinType) -> Self {
        self.fields.push(ParamDef::input(name, pin_type));
        self
    }

    /// Handle stamped onto nodes and pins
    pub fn to_ref(&self) -> StructRef {
        StructRef::new(&self.name, &self.path)
    }
}

/// Anything the resolver can look up by name or path
pub trait CatalogEntry {
    /// Short name
    fn name(&self) -> &str;
    /// Full object path
    fn path(&self) -> &str;
}

impl CatalogEntry for ClassDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }
}

impl CatalogEntry for StructDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Read-only view of the loaded types.
///
/// Iteration order of [`classes`](Self::classes) and
/// [`structs`](Self::structs) decides which entry wins an ambiguous
/// case-insensitive scan.
pub trait TypeCatalog {
    /// Every loaded class
    fn classes(&self) -> &[ClassDef];

    /// Every loaded struct
    fn structs(&self) -> &[StructDef];

    /// Look up a class by exact short name
    fn find_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes().iter().find(|c| c.name == name)
    }

    /// Load a class by full object path
    fn load_class(&self, path: &str) -> Option<&ClassDef> {
        self.classes().iter().find(|c| c.path == path)
    }

    /// Look up a struct by exact short name
    fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs().iter().find(|s| s.name == name)
    }

    /// Load a struct by full object path
    fn load_struct(&self, path: &str) -> Option<&StructDef> {
        self.structs().iter().find(|s| s.path == path)
    }
}

/// A fixed catalog snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    /// Classes in lookup order
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    /// Structs in lookup order
    #[serde(default)]
    pub structs: Vec<StructDef>,
}

impl TypeCatalog for StaticCatalog {
    fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    fn structs(&self) -> &[StructDef] {
        &self.structs
    }
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.classes.push(class);
        self
    }

    /// Add a struct
    pub fn with_struct(mut self, struct_def: StructDef) -> Self {
        self.structs.push(struct_def);
        self
    }

    /// Parse a catalog from RON text
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Serialize to pretty RON text
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Load a catalog from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// The engine types every blueprint can see
    pub fn builtin() -> Self {
        let object = || PinType::object(ClassRef::new(OBJECT_CLASS, "/Script/CoreUObject.Object"));
        let actor = || PinType::object(ClassRef::new("AActor", "/Script/Engine.Actor"));
        let world_context = || ParamDef::input("WorldContextObject", object());

        Self::new()
            .with_class(ClassDef::new(OBJECT_CLASS, "/Script/CoreUObject.Object"))
            // Actors
            .with_class(
                ClassDef::new("AActor", "/Script/Engine.Actor")
                    .extends(OBJECT_CLASS)
                    .with_function(FunctionDef::new("ReceiveBeginPlay"))
                    .with_function(
                        FunctionDef::new("ReceiveTick")
                            .param(ParamDef::input("DeltaSeconds", PinType::float())),
                    )
                    .with_function(
                        FunctionDef::new("ReceiveActorBeginOverlap")
                            .param(ParamDef::input("OtherActor", actor())),
                    )
                    .with_function(FunctionDef::new("K2_GetActorLocation").pure().returns(PinType::vector()))
                    .with_function(
                        FunctionDef::new("K2_SetActorLocation")
                            .param(ParamDef::input("NewLocation", PinType::vector()))
                            .param(ParamDef::input("bSweep", PinType::boolean()).with_default("false"))
                            .returns(PinType::boolean()),
                    )
                    .with_function(
                        FunctionDef::new("SetActorHiddenInGame")
                            .param(ParamDef::input("bNewHidden", PinType::boolean())),
                    )
                    .with_function(FunctionDef::new("K2_DestroyActor"))
                    .with_delegate(
                        DelegateDef::new("OnDestroyed")
                            .param(ParamDef::input("DestroyedActor", actor())),
                    )
                    .with_delegate(
                        DelegateDef::new("OnActorBeginOverlap")
                            .param(ParamDef::input("OverlappedActor", actor()))
                            .param(ParamDef::input("OtherActor", actor())),
                    ),
            )
            .with_class(ClassDef::new("APawn", "/Script/Engine.Pawn").extends("AActor"))
            .with_class(
                ClassDef::new("ACharacter", "/Script/Engine.Character")
                    .extends("APawn")
                    .with_function(FunctionDef::new("Jump"))
                    .with_function(FunctionDef::new("StopJumping")),
            )
            .with_class(ClassDef::new("ACameraActor", "/Script/Engine.CameraActor").extends("AActor"))
            // Components
            .with_class(
                ClassDef::new("UActorComponent", "/Script/Engine.ActorComponent")
                    .extends(OBJECT_CLASS)
                    .with_function(
                        FunctionDef::new("SetActive")
                            .param(ParamDef::input("bNewActive", PinType::boolean()))
                            .param(ParamDef::input("bReset", PinType::boolean()).with_default("false")),
                    ),
            )
            .with_class(
                ClassDef::new("USceneComponent", "/Script/Engine.SceneComponent")
                    .extends("UActorComponent")
                    .with_function(
                        FunctionDef::new("K2_SetRelativeLocation")
                            .param(ParamDef::input("NewLocation", PinType::vector()))
                            .param(ParamDef::input("bSweep", PinType::boolean()).with_default("false")),
                    )
                    .with_function(
                        FunctionDef::new("SetVisibility")
                            .param(ParamDef::input("bNewVisibility", PinType::boolean()))
                            .param(ParamDef::input("bPropagateToChildren", PinType::boolean()).with_default("false")),
                    ),
            )
            .with_class(
                ClassDef::new("UStaticMeshComponent", "/Script/Engine.StaticMeshComponent")
                    .extends("USceneComponent"),
            )
            .with_class(
                ClassDef::new("ULightComponent", "/Script/Engine.LightComponent")
                    .extends("USceneComponent")
                    .with_function(
                        FunctionDef::new("SetIntensity")
                            .param(ParamDef::input("NewIntensity", PinType::float())),
                    ),
            )
            // Function libraries
            .with_class(ClassDef::new("UBlueprintFunctionLibrary", "/Script/Engine.BlueprintFunctionLibrary").extends(OBJECT_CLASS))
            .with_class(
                ClassDef::new("UGameplayStatics", "/Script/Engine.GameplayStatics")
                    .extends("UBlueprintFunctionLibrary")
                    .with_function(
                        FunctionDef::new("GetActorOfClass")
                            .static_fn()
                            .param(world_context())
                            .param(ParamDef::input("ActorClass", PinType::class(ClassRef::new("AActor", "/Script/Engine.Actor"))))
                            .returns(actor()),
                    )
                    .with_function(
                        FunctionDef::new("GetPlayerPawn")
                            .static_fn()
                            .pure()
                            .param(world_context())
                            .param(ParamDef::input("PlayerIndex", PinType::int()).with_default("0"))
                            .returns(PinType::object(ClassRef::new("APawn", "/Script/Engine.Pawn"))),
                    )
                    .with_function(
                        FunctionDef::new("SetGamePaused")
                            .static_fn()
                            .param(world_context())
                            .param(ParamDef::input("bPaused", PinType::boolean()))
                            .returns(PinType::boolean()),
                    )
                    .with_function(
                        FunctionDef::new("OpenLevel")
                            .static_fn()
                            .param(world_context())
                            .param(ParamDef::input("LevelName", PinType::new(PinCategory::Name)))
                            .param(ParamDef::input("bAbsolute", PinType::boolean()).with_default("true"))
                            .param(ParamDef::input("Options", PinType::string())),
                    ),
            )
            .with_class(
                ClassDef::new("UKismetSystemLibrary", "/Script/Engine.KismetSystemLibrary")
                    .extends("UBlueprintFunctionLibrary")
                    .with_function(
                        FunctionDef::new("PrintString")
                            .static_fn()
                            .param(world_context())
                            .param(ParamDef::input("InString", PinType::string()).with_default("Hello"))
                            .param(ParamDef::input("bPrintToScreen", PinType::boolean()).with_default("true"))
                            .param(ParamDef::input("bPrintToLog", PinType::boolean()).with_default("true"))
                            .param(ParamDef::input("Duration", PinType::float()).with_default("2.0")),
                    )
                    .with_function(
                        FunctionDef::new("Delay")
                            .static_fn()
                            .param(world_context())
                            .param(ParamDef::input("Duration", PinType::float()).with_default("0.2")),
                    ),
            )
            .with_class(
                ClassDef::new("UKismetMathLibrary", "/Script/Engine.KismetMathLibrary")
                    .extends("UBlueprintFunctionLibrary")
                    .with_function(
                        FunctionDef::new("RandomFloatInRange")
                            .static_fn()
                            .pure()
                            .param(ParamDef::input("Min", PinType::float()))
                            .param(ParamDef::input("Max", PinType::float()))
                            .returns(PinType::float()),
                    )
                    .with_function(
                        FunctionDef::new("MakeVector")
                            .static_fn()
                            .pure()
                            .param(ParamDef::input("X", PinType::float()))
                            .param(ParamDef::input("Y", PinType::float()))
                            .param(ParamDef::input("Z", PinType::float()))
                            .returns(PinType::vector()),
                    ),
            )
            // Subsystems
            .with_class(ClassDef::new(SUBSYSTEM_CLASS, "/Script/Engine.Subsystem").extends(OBJECT_CLASS))
            .with_class(ClassDef::new("UGameInstanceSubsystem", "/Script/Engine.GameInstanceSubsystem").extends(SUBSYSTEM_CLASS))
            .with_class(ClassDef::new("UWorldSubsystem", "/Script/Engine.WorldSubsystem").extends(SUBSYSTEM_CLASS))
            // Widgets
            .with_class(
                ClassDef::new("UWidget", "/Script/UMG.Widget")
                    .extends(OBJECT_CLASS)
                    .with_function(
                        FunctionDef::new("SetIsEnabled")
                            .param(ParamDef::input("bInIsEnabled", PinType::boolean())),
                    ),
            )
            .with_class(
                ClassDef::new("UUserWidget", "/Script/UMG.UserWidget")
                    .extends("UWidget")
                    .with_function(FunctionDef::new("Construct"))
                    .with_function(FunctionDef::new("AddToViewport").param(ParamDef::input("ZOrder", PinType::int()).with_default("0"))),
            )
            .with_class(
                ClassDef::new("UButton", "/Script/UMG.Button")
                    .extends("UWidget")
                    .with_delegate(DelegateDef::new("OnClicked"))
                    .with_delegate(DelegateDef::new("OnPressed"))
                    .with_delegate(DelegateDef::new("OnReleased"))
                    .with_delegate(DelegateDef::new("OnHovered")),
            )
            .with_class(
                ClassDef::new("UTextBlock", "/Script/UMG.TextBlock")
                    .extends("UWidget")
                    .with_function(
                        FunctionDef::new("SetText")
                            .param(ParamDef::input("InText", PinType::new(PinCategory::Text))),
                    ),
            )
            .with_class(
                ClassDef::new("USlider", "/Script/UMG.Slider")
                    .extends("UWidget")
                    .with_delegate(
                        DelegateDef::new("OnValueChanged")
                            .param(ParamDef::input("Value", PinType::float())),
                    ),
            )
            // Structs
            .with_struct(
                StructDef::new("FVector", VECTOR_STRUCT_PATH)
                    .with_field("X", PinType::float())
                    .with_field("Y", PinType::float())
                    .with_field("Z", PinType::float()),
            )
            .with_struct(
                StructDef::new("FRotator", "/Script/CoreUObject.Rotator")
                    .with_field("Pitch", PinType::float())
                    .with_field("Yaw", PinType::float())
                    .with_field("Roll", PinType::float()),
            )
            .with_struct(
                StructDef::new("FLinearColor", "/Script/CoreUObject.LinearColor")
                    .with_field("R", PinType::float())
                    .with_field("G", PinType::float())
                    .with_field("B", PinType::float())
                    .with_field("A", PinType::float()),
            )
            .with_struct(
                StructDef::new("FHitResult", "/Script/Engine.HitResult")
                    .with_field("bBlockingHit", PinType::boolean())
                    .with_field("Distance", PinType::float())
                    .with_field("Location", PinType::vector())
                    .with_field("HitActor", actor()),
            )
    }
}
