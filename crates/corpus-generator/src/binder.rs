//! Field binder: compiles a generation function per field.
//!
//! A field is bound once, before any record is emitted. Binding inspects the
//! field's type and its overrides and returns a boxed closure that produces
//! one value per call. Strategies are resolved in this order, first match
//! wins:
//!
//! ```text
//!   static value (override, then descriptor)
//!        │
//!   open object ──► one sub-function per key, each bound through this order
//!        │
//!   cardinality ──► wraps the fresh strategy below
//!        │
//!   enum ──► uniform pick
//!        │
//!   type-specific generator
//! ```

use crate::error::GeneratorError;
use crate::generators::{
    keyword::KeywordShape,
    network::{random_geo_point, random_ipv4},
    numeric::NumericStrategy,
    static_value::static_value,
    timestamp::DateStrategy,
    words::{distinct_words, sentence},
};
use crate::state::GenerationState;
use corpus_core::{
    Cardinality, ConfigOverlay, ConfigOverride, Field, FieldCatalog, FieldType, Value,
};
use rand::Rng;
use tracing::debug;

/// Number of random sub-keys chosen for an object without explicit keys.
pub const DEFAULT_DYNAMIC_KEYS: usize = 5;

/// A compiled per-field generation function.
pub type GenerationFn =
    Box<dyn FnMut(&mut GenerationState) -> Result<Value, GeneratorError> + Send>;

/// Binds catalog fields to generation functions.
pub struct FieldBinder<'a> {
    catalog: &'a FieldCatalog,
    overlay: &'a ConfigOverlay,
    dynamic_key_count: usize,
}

impl<'a> FieldBinder<'a> {
    pub fn new(catalog: &'a FieldCatalog, overlay: &'a ConfigOverlay) -> Self {
        Self {
            catalog,
            overlay,
            dynamic_key_count: DEFAULT_DYNAMIC_KEYS,
        }
    }

    pub fn with_dynamic_key_count(mut self, count: usize) -> Self {
        self.dynamic_key_count = count;
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.catalog
    }

    /// Bind a field referenced by name from a template.
    pub fn bind_reference(
        &self,
        name: &str,
        state: &mut GenerationState,
    ) -> Result<GenerationFn, GeneratorError> {
        let field = self
            .catalog
            .get(name)
            .ok_or_else(|| GeneratorError::UnknownField(name.to_string()))?;
        self.bind(field, state)
    }

    /// Bind a field using its own override from the overlay.
    ///
    /// Dynamic object keys are drawn from the state's random source, so the
    /// same seed binds the same keys.
    pub fn bind(
        &self,
        field: &Field,
        state: &mut GenerationState,
    ) -> Result<GenerationFn, GeneratorError> {
        let config = self.overlay.get(&field.name);
        self.bind_with(field, config, state)
    }

    fn bind_with(
        &self,
        field: &Field,
        config: Option<&ConfigOverride>,
        state: &mut GenerationState,
    ) -> Result<GenerationFn, GeneratorError> {
        if let Some(value) = static_value(field, config.and_then(|c| c.value.as_ref())) {
            debug!("Field '{}' bound to a static value", field.name);
            return Ok(Box::new(move |_: &mut GenerationState| Ok(value.clone())));
        }

        if field.is_open_object() {
            return self.bind_object(field, config, state);
        }

        let fresh = bind_fresh(field, config)?;
        match config.and_then(|c| c.cardinality) {
            Some(cardinality) => Ok(with_cardinality(field.name.clone(), cardinality, fresh)),
            None => Ok(fresh),
        }
    }

    fn bind_object(
        &self,
        field: &Field,
        config: Option<&ConfigOverride>,
        state: &mut GenerationState,
    ) -> Result<GenerationFn, GeneratorError> {
        let sub_type = field.effective_sub_type();
        if sub_type.is_object() {
            return Err(GeneratorError::Unsatisfiable {
                field: field.name.clone(),
                reason: format!("object values of type '{sub_type}' cannot be generated"),
            });
        }

        let root = field.root_name();
        let sub_field = |key: &str| {
            let mut sub = Field::new(format!("{root}.{key}"), sub_type.clone());
            sub.example = field.example.clone();
            sub
        };

        let explicit_keys = config.map(|c| c.object_keys.as_slice()).unwrap_or_default();
        if !explicit_keys.is_empty() {
            let mut members = Vec::with_capacity(explicit_keys.len());
            for key in explicit_keys {
                let sub = sub_field(key);
                let generate = self.bind_with(&sub, self.overlay.get(&sub.name), state)?;
                members.push((sub.name, generate));
            }
            debug!(
                "Field '{}' bound with {} explicit keys",
                field.name,
                members.len()
            );

            return Ok(Box::new(move |state: &mut GenerationState| {
                let mut values = Vec::with_capacity(members.len());
                for (name, generate) in members.iter_mut() {
                    state.mark_key_seen(name);
                    let value = generate(state)?;
                    if !value.is_empty() {
                        values.push((name.clone(), value));
                    }
                }
                Ok(Value::Members(values))
            }));
        }

        let pattern = format!("{root}.*");
        let sub_config = self.overlay.get(&pattern).or(config);

        let keys = distinct_words(state.rng(), self.dynamic_key_count);

        let mut members = Vec::with_capacity(keys.len());
        for key in keys {
            let sub = sub_field(key);
            let generate = self.bind_with(&sub, sub_config, state)?;
            members.push((sub.name, generate));
        }
        debug!(
            "Field '{}' bound with {} dynamic keys",
            field.name,
            members.len()
        );

        Ok(Box::new(move |state: &mut GenerationState| {
            let mut values = Vec::new();
            for (name, generate) in members.iter_mut() {
                if !state.rng().gen_bool(0.5) || !state.mark_key_seen(name) {
                    continue;
                }
                let value = generate(state)?;
                if !value.is_empty() {
                    values.push((name.clone(), value));
                }
            }
            Ok(Value::Members(values))
        }))
    }
}

/// Reuse the previous value inside a cardinality window.
///
/// The first event of each window generates and stores a fresh value; the
/// rest repeat it. A ratio is resolved against the planned event count,
/// which may only become known after the first record.
fn with_cardinality(
    name: String,
    cardinality: Cardinality,
    mut fresh: GenerationFn,
) -> GenerationFn {
    Box::new(move |state: &mut GenerationState| {
        let window = cardinality.window(state.total_events().unwrap_or(1));
        if state.event_index() % window != 0 {
            if let Some(previous) = state.previous(&name) {
                return Ok(previous.clone());
            }
        }
        let value = fresh(state)?;
        state.remember(&name, value.clone());
        Ok(value)
    })
}

/// Strategy for a field with no static value, before cardinality.
fn bind_fresh(
    field: &Field,
    config: Option<&ConfigOverride>,
) -> Result<GenerationFn, GeneratorError> {
    let name = field.name.clone();

    if let Some(entries) = config.and_then(|c| c.enum_values.as_ref()) {
        let choices: Vec<Value> = entries
            .iter()
            .map(|entry| Value::from_literal(entry, &field.field_type))
            .collect();
        return Ok(Box::new(move |state: &mut GenerationState| {
            let idx = state.rng().gen_range(0..choices.len());
            Ok(choices[idx].clone())
        }));
    }

    let generate: GenerationFn = match &field.field_type {
        FieldType::Date => {
            let strategy = DateStrategy::from_override(&name, config);
            Box::new(move |state: &mut GenerationState| strategy.generate(&name, state))
        }
        FieldType::Ip => Box::new(|state: &mut GenerationState| {
            Ok(Value::String(random_ipv4(state.rng())))
        }),
        FieldType::GeoPoint => Box::new(|state: &mut GenerationState| {
            Ok(Value::String(random_geo_point(state.rng())))
        }),
        FieldType::Boolean => Box::new(|state: &mut GenerationState| {
            Ok(Value::Bool(state.rng().gen_bool(0.5)))
        }),
        FieldType::Keyword => {
            let shape = KeywordShape::from_example(field.example.as_deref());
            Box::new(move |state: &mut GenerationState| {
                Ok(Value::String(shape.generate(state.rng())))
            })
        }
        FieldType::ConstantKeyword => {
            let shape = KeywordShape::from_example(field.example.as_deref());
            Box::new(move |state: &mut GenerationState| {
                if let Some(value) = state.constant(&name) {
                    return Ok(value.clone());
                }
                let value = Value::String(shape.generate(state.rng()));
                state.set_constant(&name, value.clone());
                Ok(value)
            })
        }
        t if t.is_numeric() => {
            let strategy = NumericStrategy::new(
                field,
                config.and_then(|c| c.numeric_range()),
                config.and_then(|c| c.fuzziness),
            );
            match strategy.fuzziness() {
                Some(fuzziness) => Box::new(move |state: &mut GenerationState| {
                    let value = match state.previous(&name).cloned() {
                        Some(previous) => strategy.drift(state.rng(), &previous, fuzziness),
                        None => strategy.sample(state.rng()),
                    };
                    state.remember(&name, value.clone());
                    Ok(value)
                }),
                None => Box::new(move |state: &mut GenerationState| {
                    Ok(strategy.sample(state.rng()))
                }),
            }
        }
        t if t.is_object() => {
            return Err(GeneratorError::Unsatisfiable {
                field: name,
                reason: format!("type '{t}' needs object binding"),
            })
        }
        _ => Box::new(|state: &mut GenerationState| Ok(Value::String(sentence(state.rng())))),
    };

    Ok(generate)
}
