//! Shared plumbing for parameter records.
//!
//! A record is a fixed set of optional declared fields plus an open map of
//! additional properties. `param_record!` declares the struct, its typed
//! accessors, the wire-name table, payload decode/encode, serde impls and the
//! diagnostic `Display` rendering. Declared fields are emitted in declaration
//! order; additional properties follow in insertion order.

use crate::errors::{ParamsError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Wire (snake_case) and in-memory (camelCase) names of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub wire: &'static str,
    pub camel: &'static str,
}

/// Operations common to every parameter record type.
pub trait Record: Sized + Default + Clone + fmt::Debug + fmt::Display {
    /// Type name used in errors and the display string.
    const NAME: &'static str;

    /// Declared fields in schema order.
    const FIELDS: &'static [FieldSpec];

    /// Builds a record from an object payload.
    ///
    /// Declared keys are converted to the field type; `null` leaves the field
    /// unset. Any other key is kept verbatim as an additional property.
    fn decode(payload: Value) -> Result<Self>;

    /// Emits present declared fields in schema order, then additional
    /// properties. Unset fields are omitted rather than written as `null`.
    fn encode(&self) -> Value;

    /// Looks a value up by wire name, declared or additional.
    fn get(&self, name: &str) -> Option<Value>;

    /// Entries whose keys are not declared fields, in insertion order.
    fn additional_properties(&self) -> &Map<String, Value>;

    /// Maps an in-memory name back to its wire name.
    fn wire_name(camel: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .find(|spec| spec.camel == camel)
            .map(|spec| spec.wire)
    }

    fn is_declared(wire: &str) -> bool {
        Self::FIELDS.iter().any(|spec| spec.wire == wire)
    }
}

/// A declared field's value type.
///
/// `View` is what the getter hands out: `&str` for text, a slice for lists,
/// the number itself for numerics.
pub trait ParamValue: Clone + fmt::Debug + PartialEq + DeserializeOwned {
    type View<'a>
    where
        Self: 'a;

    fn view(&self) -> Self::View<'_>;

    /// JSON form of the value; `None` when it has none and must be omitted.
    fn to_json(&self) -> Option<Value>;

    /// Lenient conversion tried when the payload value does not have the
    /// declared type, e.g. numeric text for a number field.
    fn coerce(_value: &Value) -> Option<Self> {
        None
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl ParamValue for String {
    type View<'a> = &'a str where Self: 'a;

    fn view(&self) -> &str {
        self
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl ParamValue for Vec<String> {
    type View<'a> = &'a [String] where Self: 'a;

    fn view(&self) -> &[String] {
        self
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::Array(self.iter().cloned().map(Value::String).collect()))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.join(", "))
    }
}

impl ParamValue for i64 {
    type View<'a> = i64;

    fn view(&self) -> i64 {
        *self
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::from(*self))
    }

    // Integral reals and numeric text, "11.0" included.
    fn coerce(value: &Value) -> Option<Self> {
        let real = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => {
                let s = s.trim();
                if let Ok(int) = s.parse::<i64>() {
                    return Some(int);
                }
                s.parse::<f64>().ok()?
            }
            _ => return None,
        };
        let in_range = real >= i64::MIN as f64 && real < i64::MAX as f64;
        (real.fract() == 0.0 && in_range).then_some(real as i64)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl ParamValue for f64 {
    type View<'a> = f64;

    fn view(&self) -> f64 {
        *self
    }

    // Non-finite values have no JSON form.
    fn to_json(&self) -> Option<Value> {
        self.is_finite().then(|| Value::from(*self))
    }

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|real| real.is_finite()),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

pub(crate) fn decode_field<T: ParamValue>(
    record: &'static str,
    field: &'static str,
    value: Value,
) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(source) => match T::coerce(&value) {
            Some(coerced) => {
                debug!(record, field, %value, "coerced payload value to declared type");
                Ok(Some(coerced))
            }
            None => Err(ParamsError::TypeMismatch {
                record,
                field,
                source,
            }),
        },
    }
}

pub(crate) fn expect_object(record: &'static str, payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(ParamsError::NotAnObject {
            record,
            found: value_kind(&other),
        }),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Writes `Name [a=1, b=null, additionalProperties={k=v}]`.
pub(crate) struct DisplayFields<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl<'a, 'b> DisplayFields<'a, 'b> {
    pub(crate) fn new(
        f: &'a mut fmt::Formatter<'b>,
        record: &str,
    ) -> std::result::Result<Self, fmt::Error> {
        write!(f, "{record} [")?;
        Ok(Self { f, first: true })
    }

    pub(crate) fn field<T: ParamValue>(&mut self, name: &str, value: Option<&T>) -> fmt::Result {
        self.separator()?;
        write!(self.f, "{name}=")?;
        match value {
            Some(value) => value.render(self.f),
            None => self.f.write_str("null"),
        }
    }

    pub(crate) fn finish(mut self, additional: &Map<String, Value>) -> fmt::Result {
        self.separator()?;
        self.f.write_str("additionalProperties={")?;
        for (i, (key, value)) in additional.iter().enumerate() {
            if i > 0 {
                self.f.write_str(", ")?;
            }
            write!(self.f, "{key}={value}")?;
        }
        self.f.write_str("}]")
    }

    fn separator(&mut self) -> fmt::Result {
        if self.first {
            self.first = false;
            Ok(())
        } else {
            self.f.write_str(", ")
        }
    }
}

/// Declares a parameter record.
///
/// Each field line is `wire_name as "camelName": Type, set setter, with builder;`.
/// The Rust field name doubles as the wire name.
macro_rules! param_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident as $camel:literal: $ty:ty, set $setter:ident, with $with:ident;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( $field: Option<$ty>, )+
            additional_properties: ::serde_json::Map<String, ::serde_json::Value>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> Option<<$ty as $crate::record::ParamValue>::View<'_>> {
                    self.$field.as_ref().map($crate::record::ParamValue::view)
                }

                pub fn $setter(&mut self, value: Option<$ty>) {
                    self.$field = value;
                }

                pub fn $with(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )+

            pub fn additional_property(&self, name: &str) -> Option<&::serde_json::Value> {
                self.additional_properties.get(name)
            }

            /// Stores a payload entry. A declared wire name is routed to its
            /// field and type-checked; anything else is kept as an additional
            /// property.
            pub fn set_additional_property(
                &mut self,
                name: impl Into<String>,
                value: ::serde_json::Value,
            ) -> $crate::errors::Result<()> {
                let name = name.into();
                match name.as_str() {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::record::decode_field(
                                stringify!($name),
                                stringify!($field),
                                value,
                            )?;
                        }
                    )+
                    _ => {
                        ::tracing::debug!(
                            record = stringify!($name),
                            field = %name,
                            "keeping undeclared field as additional property"
                        );
                        self.additional_properties.insert(name, value);
                    }
                }
                Ok(())
            }

            pub fn with_additional_property(
                mut self,
                name: impl Into<String>,
                value: impl Into<::serde_json::Value>,
            ) -> $crate::errors::Result<Self> {
                self.set_additional_property(name, value.into())?;
                Ok(self)
            }
        }

        impl $crate::record::Record for $name {
            const NAME: &'static str = stringify!($name);

            const FIELDS: &'static [$crate::record::FieldSpec] = &[
                $( $crate::record::FieldSpec { wire: stringify!($field), camel: $camel }, )+
            ];

            fn decode(payload: ::serde_json::Value) -> $crate::errors::Result<Self> {
                let object = $crate::record::expect_object(Self::NAME, payload)?;
                let mut record = Self::new();
                for (key, value) in object {
                    record.set_additional_property(key, value)?;
                }
                Ok(record)
            }

            fn encode(&self) -> ::serde_json::Value {
                let mut payload = ::serde_json::Map::new();
                $(
                    if let Some(value) = self
                        .$field
                        .as_ref()
                        .and_then($crate::record::ParamValue::to_json)
                    {
                        payload.insert(stringify!($field).to_owned(), value);
                    }
                )+
                for (key, value) in &self.additional_properties {
                    payload.insert(key.clone(), value.clone());
                }
                ::serde_json::Value::Object(payload)
            }

            fn get(&self, name: &str) -> Option<::serde_json::Value> {
                match name {
                    $(
                        stringify!($field) => self
                            .$field
                            .as_ref()
                            .and_then($crate::record::ParamValue::to_json),
                    )+
                    _ => self.additional_properties.get(name).cloned(),
                }
            }

            fn additional_properties(&self) -> &::serde_json::Map<String, ::serde_json::Value> {
                &self.additional_properties
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut out = $crate::record::DisplayFields::new(f, stringify!($name))?;
                $( out.field($camel, self.$field.as_ref())?; )+
                out.finish(&self.additional_properties)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(&$crate::record::Record::encode(self), serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let payload = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::record::Record>::decode(payload).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use param_record;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    param_record! {
        /// Two-field record for exercising the macro in isolation.
        pub struct Sample {
            name as "name": String, set set_name, with with_name;
            score_cutoff as "scoreCutoff": f64, set set_score_cutoff, with with_score_cutoff;
        }
    }

    #[test]
    fn field_table_follows_declaration_order() {
        let wires: Vec<_> = Sample::FIELDS.iter().map(|spec| spec.wire).collect();
        assert_eq!(wires, ["name", "score_cutoff"]);
        assert_eq!(Sample::wire_name("scoreCutoff"), Some("score_cutoff"));
        assert_eq!(Sample::wire_name("score_cutoff"), None);
        assert!(Sample::is_declared("name"));
        assert!(!Sample::is_declared("scoreCutoff"));
    }

    #[test]
    fn integer_payload_value_fills_real_field() {
        let sample = Sample::decode(json!({ "score_cutoff": 75 })).unwrap();
        assert_eq!(sample.score_cutoff(), Some(75.0));
    }

    #[test]
    fn numeric_text_and_scalars_are_coerced() {
        let sample = Sample::decode(json!({ "name": 12345, "score_cutoff": " 0.5 " })).unwrap();
        assert_eq!(sample.name(), Some("12345"));
        assert_eq!(sample.score_cutoff(), Some(0.5));

        let sample = Sample::decode(json!({ "name": true })).unwrap();
        assert_eq!(sample.name(), Some("true"));
    }

    #[test]
    fn non_numeric_or_non_finite_text_stays_a_mismatch() {
        for bad in ["high", "NaN", "inf", ""] {
            let err = Sample::decode(json!({ "score_cutoff": bad })).unwrap_err();
            assert!(
                matches!(err, ParamsError::TypeMismatch { field: "score_cutoff", .. }),
                "accepted {bad:?}"
            );
        }
        assert!(Sample::decode(json!({ "name": ["a"] })).is_err());
    }

    #[test]
    fn integer_coercion_rules() {
        assert_eq!(i64::coerce(&json!("11")), Some(11));
        assert_eq!(i64::coerce(&json!(" -3 ")), Some(-3));
        assert_eq!(i64::coerce(&json!("11.0")), Some(11));
        assert_eq!(i64::coerce(&json!(11.0)), Some(11));
        assert_eq!(i64::coerce(&json!(11.5)), None);
        assert_eq!(i64::coerce(&json!("11.5")), None);
        assert_eq!(i64::coerce(&json!(u64::MAX)), None);
        assert_eq!(i64::coerce(&json!(true)), None);
    }

    #[test]
    fn non_finite_reals_are_omitted_on_encode() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let sample = Sample::new().with_name("x").with_score_cutoff(value);
            assert_eq!(sample.encode(), json!({ "name": "x" }));
            assert_eq!(sample.get("score_cutoff"), None);
            let again = Sample::decode(sample.encode()).unwrap();
            assert_eq!(again.score_cutoff(), None);
        }
    }

    #[test]
    fn null_leaves_declared_field_unset() {
        let sample = Sample::decode(json!({ "name": null })).unwrap();
        assert_eq!(sample.name(), None);
        assert!(sample.additional_properties().is_empty());
        assert_eq!(sample.encode(), json!({}));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Sample::decode(json!(["name"])).unwrap_err();
        assert!(matches!(
            err,
            ParamsError::NotAnObject { record: "Sample", found: "an array" }
        ));
    }

    #[test]
    fn routed_property_is_type_checked() {
        let mut sample = Sample::new();
        let err = sample
            .set_additional_property("score_cutoff", json!("high"))
            .unwrap_err();
        assert!(matches!(
            err,
            ParamsError::TypeMismatch { field: "score_cutoff", .. }
        ));
        sample.set_additional_property("name", json!("kaiju")).unwrap();
        assert_eq!(sample.name(), Some("kaiju"));
        assert!(sample.additional_property("name").is_none());
    }

    #[test]
    fn display_lists_unset_fields_as_null() {
        let sample = Sample::new()
            .with_name("x")
            .with_additional_property("note", "hi")
            .unwrap();
        assert_eq!(
            sample.to_string(),
            r#"Sample [name=x, scoreCutoff=null, additionalProperties={note="hi"}]"#
        );
    }
}
