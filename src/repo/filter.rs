//! Field-condition filters accepted by `UserRepository::select`.

// std
use std::cmp::Ordering;
// self
use crate::_prelude::*;

/// Single condition applied to one serialized field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "value")]
pub enum Condition {
	/// Field equals the value (`null` also matches an absent field).
	Eq(JsonValue),
	/// Field differs from the value.
	Ne(JsonValue),
	/// Field is strictly greater than the value.
	Gt(JsonValue),
	/// Field is greater than or equal to the value.
	Ge(JsonValue),
	/// Field is strictly less than the value.
	Lt(JsonValue),
	/// Field is less than or equal to the value.
	Le(JsonValue),
	/// Field lies within the inclusive range.
	Between {
		/// Inclusive lower bound.
		low: JsonValue,
		/// Inclusive upper bound.
		high: JsonValue,
	},
	/// Field equals one of the listed values.
	In(Vec<JsonValue>),
	/// String field contains the substring.
	Like(String),
}
impl Condition {
	/// Evaluates the condition against a field value (`Null` when the field is absent).
	pub fn matches(&self, field: &JsonValue) -> bool {
		match self {
			Self::Eq(expected) => loosely_equal(field, expected),
			Self::Ne(expected) => !loosely_equal(field, expected),
			Self::Gt(bound) => compare(field, bound).is_some_and(Ordering::is_gt),
			Self::Ge(bound) => compare(field, bound).is_some_and(Ordering::is_ge),
			Self::Lt(bound) => compare(field, bound).is_some_and(Ordering::is_lt),
			Self::Le(bound) => compare(field, bound).is_some_and(Ordering::is_le),
			Self::Between { low, high } =>
				compare(field, low).is_some_and(Ordering::is_ge)
					&& compare(field, high).is_some_and(Ordering::is_le),
			Self::In(candidates) => candidates.iter().any(|c| loosely_equal(field, c)),
			Self::Like(needle) => field.as_str().is_some_and(|s| s.contains(needle.as_str())),
		}
	}
}

/// Conjunction of per-field conditions; an empty filter matches every record.
///
/// Keys are serialized field names of [`User`](crate::account::User). Conditions on the same
/// field are all applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserFilter(BTreeMap<String, Vec<Condition>>);
impl UserFilter {
	/// Creates an empty filter.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an arbitrary condition for a field.
	pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
		self.0.entry(field.into()).or_default().push(condition);

		self
	}

	/// Adds an equality condition.
	pub fn equals(self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.with(field, Condition::Eq(value.into()))
	}

	/// Adds an inclusive range condition.
	pub fn between(
		self,
		field: impl Into<String>,
		low: impl Into<JsonValue>,
		high: impl Into<JsonValue>,
	) -> Self {
		self.with(field, Condition::Between { low: low.into(), high: high.into() })
	}

	/// Adds a substring condition.
	pub fn like(self, field: impl Into<String>, needle: impl Into<String>) -> Self {
		self.with(field, Condition::Like(needle.into()))
	}

	/// Returns `true` when no conditions are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(field, conditions)` pairs in field order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Condition])> {
		self.0.iter().map(|(field, conditions)| (field.as_str(), conditions.as_slice()))
	}

	/// Evaluates every condition against a serialized record object.
	pub fn matches(&self, record: &JsonValue) -> bool {
		self.0.iter().all(|(field, conditions)| {
			let value = record.get(field).unwrap_or(&JsonValue::Null);

			conditions.iter().all(|condition| condition.matches(value))
		})
	}
}
impl From<BTreeMap<String, JsonValue>> for UserFilter {
	fn from(equalities: BTreeMap<String, JsonValue>) -> Self {
		equalities
			.into_iter()
			.fold(Self::new(), |filter, (field, value)| filter.equals(field, value))
	}
}
impl From<HashMap<String, JsonValue>> for UserFilter {
	fn from(equalities: HashMap<String, JsonValue>) -> Self {
		equalities
			.into_iter()
			.fold(Self::new(), |filter, (field, value)| filter.equals(field, value))
	}
}

fn loosely_equal(field: &JsonValue, expected: &JsonValue) -> bool {
	match (field, expected) {
		(JsonValue::Number(_), JsonValue::Number(_)) =>
			compare(field, expected).is_some_and(Ordering::is_eq),
		_ => field == expected,
	}
}

fn compare(field: &JsonValue, bound: &JsonValue) -> Option<Ordering> {
	match (field, bound) {
		(JsonValue::Number(a), JsonValue::Number(b)) => match (a.as_i64(), b.as_i64()) {
			(Some(a), Some(b)) => Some(a.cmp(&b)),
			_ => a.as_f64()?.partial_cmp(&b.as_f64()?),
		},
		(JsonValue::String(a), JsonValue::String(b)) => Some(a.cmp(b)),
		(JsonValue::Bool(a), JsonValue::Bool(b)) => Some(a.cmp(b)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn record() -> JsonValue {
		json!({ "sysno": 3, "username": "alice", "status": 1, "email": null })
	}

	#[test]
	fn empty_filter_matches_everything() {
		assert!(UserFilter::new().matches(&record()));
	}

	#[test]
	fn equality_treats_integers_and_floats_alike() {
		assert!(UserFilter::new().equals("status", 1).matches(&record()));
		assert!(UserFilter::new().equals("status", 1.0).matches(&record()));
		assert!(!UserFilter::new().equals("status", 0).matches(&record()));
	}

	#[test]
	fn null_equality_matches_absent_fields() {
		assert!(UserFilter::new().equals("email", JsonValue::Null).matches(&record()));
		assert!(UserFilter::new().equals("mobile", JsonValue::Null).matches(&record()));
	}

	#[test]
	fn range_conditions_are_inclusive_and_type_checked() {
		assert!(UserFilter::new().between("sysno", 3, 5).matches(&record()));
		assert!(!UserFilter::new().with("sysno", Condition::Gt(json!(3))).matches(&record()));
		assert!(!UserFilter::new().with("sysno", Condition::Lt(json!("9"))).matches(&record()));
	}

	#[test]
	fn conditions_on_one_field_are_conjunctive() {
		let filter = UserFilter::new()
			.with("sysno", Condition::Ge(json!(1)))
			.with("sysno", Condition::Le(json!(2)));

		assert!(!filter.matches(&record()));
	}

	#[test]
	fn like_and_in_conditions() {
		assert!(UserFilter::new().like("username", "lic").matches(&record()));
		assert!(!UserFilter::new().like("status", "1").matches(&record()));
		assert!(
			UserFilter::new()
				.with("username", Condition::In(vec![json!("bob"), json!("alice")]))
				.matches(&record())
		);
	}

	#[test]
	fn plain_maps_become_equality_filters() {
		let map = BTreeMap::from([("username".to_owned(), json!("alice"))]);
		let filter = UserFilter::from(map);

		assert_eq!(filter.iter().count(), 1);
		assert!(filter.matches(&record()));
	}

	#[test]
	fn filter_serializes_with_tagged_conditions() {
		let filter = UserFilter::new().between("sysno", 1, 2);
		let payload = serde_json::to_value(&filter).expect("Filter should serialize to JSON.");

		assert_eq!(
			payload,
			json!({ "sysno": [{ "op": "between", "value": { "low": 1, "high": 2 } }] })
		);
	}
}
