use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

enum Dependency {
    /// Property-list form: the listed properties must accompany the trigger.
    Required(Vec<String>),
    /// Schema form: the whole object must match when the trigger is present.
    Schema(Validators),
}

pub(crate) struct DependenciesValidator {
    dependent: Vec<(String, Dependency)>,
    definition: Arc<Value>,
}

impl DependenciesValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        match schema {
            Value::Object(map) => {
                let mut dependent = Vec::with_capacity(map.len());
                for (property, dependency) in map {
                    let dependency = match dependency {
                        Value::Array(items) => {
                            let mut required = Vec::with_capacity(items.len());
                            for item in items {
                                match item {
                                    Value::String(name) => required.push(name.clone()),
                                    _ => return Err(CompilationError::SchemaError),
                                }
                            }
                            Dependency::Required(required)
                        }
                        Value::Object(_) | Value::Bool(_) => {
                            Dependency::Schema(compile_validators(dependency, context)?)
                        }
                        _ => return Err(CompilationError::SchemaError),
                    };
                    dependent.push((property.clone(), dependency));
                }
                Ok(Box::new(DependenciesValidator {
                    dependent,
                    definition: Arc::clone(&context.definition),
                }))
            }
            _ => Err(CompilationError::SchemaError),
        }
    }
}

impl Validate for DependenciesValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        let triggered: Vec<usize> = match &*instance {
            Value::Object(map) => self
                .dependent
                .iter()
                .enumerate()
                .filter(|(_, (property, _))| map.contains_key(property))
                .map(|(idx, _)| idx)
                .collect(),
            _ => return Ok(()),
        };
        for idx in triggered {
            let (property, dependency) = &self.dependent[idx];
            match dependency {
                Dependency::Required(required) => {
                    if let Value::Object(map) = &*instance {
                        let missing: Vec<String> = required
                            .iter()
                            .filter(|name| !map.contains_key(*name))
                            .cloned()
                            .collect();
                        if !missing.is_empty() {
                            return Err(ValidationError::dependencies(
                                instance_path.into(),
                                instance,
                                Arc::clone(&self.definition),
                                property,
                                missing,
                            ));
                        }
                    }
                }
                Dependency::Schema(validators) => {
                    validate_each(schema, validators, instance, instance_path, context)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DependenciesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dependencies: {{{}}}",
            self.dependent
                .iter()
                .map(|(property, dependency)| match dependency {
                    Dependency::Required(required) =>
                        format!("{}: [{}]", property, required.join(", ")),
                    Dependency::Schema(validators) =>
                        format!("{}: {}", property, format_validators(validators)),
                })
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(DependenciesValidator::compile(schema, context))
}
