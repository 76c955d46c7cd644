//! Query predicates for filtering distributed data.
//!
//! Predicates travel to the cluster as identified data serializable objects
//! of factory `-20`; the member rebuilds them by class id and reads the
//! fields back in the order they were written. They can be combined with
//! the logical predicates and wrapped in a [`PagingPredicate`] to fetch
//! results one page at a time.
//!
//! # Example
//!
//! ```ignore
//! use hazelcast_client::query::*;
//!
//! // Simple equality check
//! let pred = Predicates::equal("age", &25i32)?;
//!
//! // Combined predicates
//! let pred = Predicates::and(vec![
//!     Box::new(Predicates::greater_than("age", &18i32)?),
//!     Box::new(Predicates::less_than("age", &65i32)?),
//! ]);
//! ```

mod paging_predicate;

pub use paging_predicate::{IterationType, PagingPredicate};

use std::fmt::Debug;

use hazelcast_protocol::serialization::{DataOutput, IdentifiedDataSerializable, ObjectDataOutput};
use hazelcast_protocol::{Data, HazelcastError, Result, ToData};

/// Factory ID for built-in Hazelcast predicates.
pub const PREDICATE_FACTORY_ID: i32 = -20;

/// Class IDs for predicate types in the Hazelcast protocol.
pub mod class_ids {
    /// SQL predicate class ID.
    pub const SQL_PREDICATE: i32 = 0;
    /// And predicate class ID.
    pub const AND_PREDICATE: i32 = 1;
    /// Between predicate class ID.
    pub const BETWEEN_PREDICATE: i32 = 2;
    /// Equal predicate class ID.
    pub const EQUAL_PREDICATE: i32 = 3;
    /// Greater/less than predicate class ID.
    pub const GREATER_LESS_PREDICATE: i32 = 4;
    /// Like predicate class ID.
    pub const LIKE_PREDICATE: i32 = 5;
    /// Case-insensitive like predicate class ID.
    pub const ILIKE_PREDICATE: i32 = 6;
    /// In predicate class ID.
    pub const IN_PREDICATE: i32 = 7;
    /// Instance-of predicate class ID.
    pub const INSTANCE_OF_PREDICATE: i32 = 8;
    /// Not equal predicate class ID.
    pub const NOT_EQUAL_PREDICATE: i32 = 9;
    /// Not predicate class ID.
    pub const NOT_PREDICATE: i32 = 10;
    /// Or predicate class ID.
    pub const OR_PREDICATE: i32 = 11;
    /// Regex predicate class ID.
    pub const REGEX_PREDICATE: i32 = 12;
    /// False predicate class ID.
    pub const FALSE_PREDICATE: i32 = 13;
    /// True predicate class ID.
    pub const TRUE_PREDICATE: i32 = 14;
    /// Paging predicate class ID.
    pub const PAGING_PREDICATE: i32 = 15;
}

/// Trait for predicates that can filter map entries.
pub trait Predicate: Debug + Send + Sync {
    /// Returns the class ID for this predicate type.
    fn class_id(&self) -> i32;

    /// Writes the predicate-specific fields to the output.
    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()>;

    /// Serializes this predicate into a `Data` blob.
    fn to_data(&self) -> Result<Data> {
        PredicateObject(self).to_data()
    }
}

/// Adapts a predicate to the identified data serializable format so it can
/// be serialized on its own or nested with `write_object`.
pub(crate) struct PredicateObject<'a, P: ?Sized>(pub(crate) &'a P);

impl<P: Predicate + ?Sized> IdentifiedDataSerializable for PredicateObject<'_, P> {
    fn factory_id(&self) -> i32 {
        PREDICATE_FACTORY_ID
    }

    fn class_id(&self) -> i32 {
        self.0.class_id()
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        self.0.write_data(output)
    }
}

fn write_predicate(output: &mut ObjectDataOutput, predicate: &dyn Predicate) -> Result<()> {
    output.write_object(&PredicateObject(predicate))
}

fn write_predicate_list(
    output: &mut ObjectDataOutput,
    predicates: &[Box<dyn Predicate>],
) -> Result<()> {
    output.write_int(predicates.len() as i32)?;
    for predicate in predicates {
        write_predicate(output, predicate.as_ref())?;
    }
    Ok(())
}

fn serialize_value<V: ToData + ?Sized>(value: &V) -> Result<Data> {
    value.to_data()
}

/// Predicate that matches every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruePredicate;

impl TruePredicate {
    /// Creates a new true predicate.
    pub fn new() -> Self {
        Self
    }
}

impl Predicate for TruePredicate {
    fn class_id(&self) -> i32 {
        class_ids::TRUE_PREDICATE
    }

    fn write_data(&self, _output: &mut ObjectDataOutput) -> Result<()> {
        Ok(())
    }
}

/// Predicate that matches no entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FalsePredicate;

impl FalsePredicate {
    /// Creates a new false predicate.
    pub fn new() -> Self {
        Self
    }
}

impl Predicate for FalsePredicate {
    fn class_id(&self) -> i32 {
        class_ids::FALSE_PREDICATE
    }

    fn write_data(&self, _output: &mut ObjectDataOutput) -> Result<()> {
        Ok(())
    }
}

/// Predicate that checks if an attribute equals a value.
#[derive(Debug, Clone)]
pub struct EqualPredicate {
    attribute: String,
    value: Data,
}

impl EqualPredicate {
    /// Creates a new equal predicate.
    pub fn new<V: ToData + ?Sized>(attribute: impl Into<String>, value: &V) -> Result<Self> {
        Ok(Self {
            attribute: attribute.into(),
            value: serialize_value(value)?,
        })
    }
}

impl Predicate for EqualPredicate {
    fn class_id(&self) -> i32 {
        class_ids::EQUAL_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_object(&self.value)
    }
}

/// Predicate that checks if an attribute differs from a value.
#[derive(Debug, Clone)]
pub struct NotEqualPredicate {
    attribute: String,
    value: Data,
}

impl NotEqualPredicate {
    /// Creates a new not-equal predicate.
    pub fn new<V: ToData + ?Sized>(attribute: impl Into<String>, value: &V) -> Result<Self> {
        Ok(Self {
            attribute: attribute.into(),
            value: serialize_value(value)?,
        })
    }
}

impl Predicate for NotEqualPredicate {
    fn class_id(&self) -> i32 {
        class_ids::NOT_EQUAL_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_object(&self.value)
    }
}

/// Ordered comparison of an attribute against a value.
///
/// The four comparisons share one class: `less` picks the direction and
/// `equal` makes the bound inclusive.
#[derive(Debug, Clone)]
pub struct GreaterLessPredicate {
    attribute: String,
    value: Data,
    equal: bool,
    less: bool,
}

impl GreaterLessPredicate {
    /// Creates a new comparison predicate.
    pub fn new<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
        equal: bool,
        less: bool,
    ) -> Result<Self> {
        Ok(Self {
            attribute: attribute.into(),
            value: serialize_value(value)?,
            equal,
            less,
        })
    }

    /// Returns true for `<` and `<=`.
    pub fn is_less(&self) -> bool {
        self.less
    }

    /// Returns true for inclusive comparisons.
    pub fn is_equal(&self) -> bool {
        self.equal
    }
}

impl Predicate for GreaterLessPredicate {
    fn class_id(&self) -> i32 {
        class_ids::GREATER_LESS_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_object(&self.value)?;
        output.write_bool(self.equal)?;
        output.write_bool(self.less)
    }
}

/// Predicate that checks if an attribute lies within an inclusive range.
#[derive(Debug, Clone)]
pub struct BetweenPredicate {
    attribute: String,
    from: Data,
    to: Data,
}

impl BetweenPredicate {
    /// Creates a new between predicate.
    pub fn new<V: ToData + ?Sized>(attribute: impl Into<String>, from: &V, to: &V) -> Result<Self> {
        Ok(Self {
            attribute: attribute.into(),
            from: serialize_value(from)?,
            to: serialize_value(to)?,
        })
    }
}

impl Predicate for BetweenPredicate {
    fn class_id(&self) -> i32 {
        class_ids::BETWEEN_PREDICATE
    }

    // Upper bound first.
    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_object(&self.to)?;
        output.write_object(&self.from)
    }
}

/// Predicate that checks if an attribute is one of several values.
#[derive(Debug, Clone)]
pub struct InPredicate {
    attribute: String,
    values: Vec<Data>,
}

impl InPredicate {
    /// Creates a new in predicate.
    pub fn new<V: ToData>(attribute: impl Into<String>, values: &[V]) -> Result<Self> {
        let values = values.iter().map(serialize_value).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            attribute: attribute.into(),
            values,
        })
    }
}

impl Predicate for InPredicate {
    fn class_id(&self) -> i32 {
        class_ids::IN_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_int(self.values.len() as i32)?;
        for value in &self.values {
            output.write_object(value)?;
        }
        Ok(())
    }
}

/// SQL-like pattern match, `%` for any sequence and `_` for one character.
#[derive(Debug, Clone)]
pub struct LikePredicate {
    attribute: String,
    expression: String,
    case_insensitive: bool,
}

impl LikePredicate {
    /// Creates a case-sensitive like predicate.
    pub fn new(attribute: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            expression: expression.into(),
            case_insensitive: false,
        }
    }

    /// Creates a case-insensitive like predicate.
    pub fn ignore_case(attribute: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            case_insensitive: true,
            ..Self::new(attribute, expression)
        }
    }
}

impl Predicate for LikePredicate {
    fn class_id(&self) -> i32 {
        if self.case_insensitive {
            class_ids::ILIKE_PREDICATE
        } else {
            class_ids::LIKE_PREDICATE
        }
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_string(&self.expression)
    }
}

/// Predicate matching an attribute against a Java regular expression.
#[derive(Debug, Clone)]
pub struct RegexPredicate {
    attribute: String,
    regex: String,
}

impl RegexPredicate {
    /// Creates a new regex predicate.
    pub fn new(attribute: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            regex: regex.into(),
        }
    }
}

impl Predicate for RegexPredicate {
    fn class_id(&self) -> i32 {
        class_ids::REGEX_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.attribute)?;
        output.write_string(&self.regex)
    }
}

/// Predicate matching values that are instances of a server-side class.
#[derive(Debug, Clone)]
pub struct InstanceOfPredicate {
    class_name: String,
}

impl InstanceOfPredicate {
    /// Creates a new instance-of predicate for the fully qualified class name.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

impl Predicate for InstanceOfPredicate {
    fn class_id(&self) -> i32 {
        class_ids::INSTANCE_OF_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.class_name)
    }
}

/// Predicate written as an SQL `WHERE` clause, e.g. `active AND age > 30`.
#[derive(Debug, Clone)]
pub struct SqlPredicate {
    sql: String,
}

impl SqlPredicate {
    /// Creates a new SQL predicate.
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Returns the SQL expression.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Predicate for SqlPredicate {
    fn class_id(&self) -> i32 {
        class_ids::SQL_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(&self.sql)
    }
}

/// Logical AND of several predicates.
#[derive(Debug)]
pub struct AndPredicate {
    predicates: Vec<Box<dyn Predicate>>,
}

impl AndPredicate {
    /// Creates a new AND predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }

    /// Creates an AND of two predicates.
    pub fn of<P1: Predicate + 'static, P2: Predicate + 'static>(left: P1, right: P2) -> Self {
        Self::new(vec![Box::new(left), Box::new(right)])
    }
}

impl Predicate for AndPredicate {
    fn class_id(&self) -> i32 {
        class_ids::AND_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        write_predicate_list(output, &self.predicates)
    }
}

/// Logical OR of several predicates.
#[derive(Debug)]
pub struct OrPredicate {
    predicates: Vec<Box<dyn Predicate>>,
}

impl OrPredicate {
    /// Creates a new OR predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }

    /// Creates an OR of two predicates.
    pub fn of<P1: Predicate + 'static, P2: Predicate + 'static>(left: P1, right: P2) -> Self {
        Self::new(vec![Box::new(left), Box::new(right)])
    }
}

impl Predicate for OrPredicate {
    fn class_id(&self) -> i32 {
        class_ids::OR_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        write_predicate_list(output, &self.predicates)
    }
}

/// Logical negation of a predicate.
#[derive(Debug)]
pub struct NotPredicate {
    predicate: Box<dyn Predicate>,
}

impl NotPredicate {
    /// Creates a new NOT predicate.
    pub fn new<P: Predicate + 'static>(predicate: P) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl Predicate for NotPredicate {
    fn class_id(&self) -> i32 {
        class_ids::NOT_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        write_predicate(output, self.predicate.as_ref())
    }
}

/// Factory for creating predicates.
#[derive(Debug, Clone, Copy)]
pub struct Predicates;

impl Predicates {
    /// Creates a predicate matching every entry.
    pub fn always_true() -> TruePredicate {
        TruePredicate
    }

    /// Creates a predicate matching no entry.
    pub fn always_false() -> FalsePredicate {
        FalsePredicate
    }

    /// Creates a predicate from an SQL `WHERE` clause.
    pub fn sql(sql: impl Into<String>) -> SqlPredicate {
        SqlPredicate::new(sql)
    }

    /// Creates an equality predicate.
    pub fn equal<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<EqualPredicate> {
        EqualPredicate::new(attribute, value)
    }

    /// Creates an inequality predicate.
    pub fn not_equal<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<NotEqualPredicate> {
        NotEqualPredicate::new(attribute, value)
    }

    /// Creates an `attribute > value` predicate.
    pub fn greater_than<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<GreaterLessPredicate> {
        GreaterLessPredicate::new(attribute, value, false, false)
    }

    /// Creates an `attribute >= value` predicate.
    pub fn greater_equal<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<GreaterLessPredicate> {
        GreaterLessPredicate::new(attribute, value, true, false)
    }

    /// Creates an `attribute < value` predicate.
    pub fn less_than<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<GreaterLessPredicate> {
        GreaterLessPredicate::new(attribute, value, false, true)
    }

    /// Creates an `attribute <= value` predicate.
    pub fn less_equal<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        value: &V,
    ) -> Result<GreaterLessPredicate> {
        GreaterLessPredicate::new(attribute, value, true, true)
    }

    /// Creates an inclusive range predicate.
    pub fn between<V: ToData + ?Sized>(
        attribute: impl Into<String>,
        from: &V,
        to: &V,
    ) -> Result<BetweenPredicate> {
        BetweenPredicate::new(attribute, from, to)
    }

    /// Creates a membership predicate.
    pub fn is_in<V: ToData>(attribute: impl Into<String>, values: &[V]) -> Result<InPredicate> {
        InPredicate::new(attribute, values)
    }

    /// Creates a case-sensitive like predicate.
    pub fn like(attribute: impl Into<String>, expression: impl Into<String>) -> LikePredicate {
        LikePredicate::new(attribute, expression)
    }

    /// Creates a case-insensitive like predicate.
    pub fn ilike(attribute: impl Into<String>, expression: impl Into<String>) -> LikePredicate {
        LikePredicate::ignore_case(attribute, expression)
    }

    /// Creates a regex predicate.
    pub fn regex(attribute: impl Into<String>, regex: impl Into<String>) -> RegexPredicate {
        RegexPredicate::new(attribute, regex)
    }

    /// Creates an instance-of predicate.
    pub fn instance_of(class_name: impl Into<String>) -> InstanceOfPredicate {
        InstanceOfPredicate::new(class_name)
    }

    /// Creates an AND of the given predicates.
    pub fn and(predicates: Vec<Box<dyn Predicate>>) -> AndPredicate {
        AndPredicate::new(predicates)
    }

    /// Creates an OR of the given predicates.
    pub fn or(predicates: Vec<Box<dyn Predicate>>) -> OrPredicate {
        OrPredicate::new(predicates)
    }

    /// Negates a predicate.
    pub fn not<P: Predicate + 'static>(predicate: P) -> NotPredicate {
        NotPredicate::new(predicate)
    }

    /// Creates a paging predicate over all entries.
    pub fn paging<K, V>(page_size: i32) -> Result<PagingPredicate<K, V>> {
        PagingPredicate::new(page_size)
    }

    /// Creates a paging predicate over the entries matching `predicate`.
    pub fn paging_with<K, V, P: Predicate + 'static>(
        predicate: P,
        page_size: i32,
    ) -> Result<PagingPredicate<K, V>> {
        PagingPredicate::with_predicate(predicate, page_size)
    }
}

pub(crate) fn invalid_argument(message: impl Into<String>) -> HazelcastError {
    HazelcastError::InvalidArgument(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazelcast_protocol::serialization::IDENTIFIED_DATA_SERIALIZABLE_TYPE_ID;

    fn be_i32(bytes: &[u8], offset: usize) -> i32 {
        i32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn header(predicate: &dyn Predicate) -> (Data, i32, i32) {
        let data = predicate.to_data().unwrap();
        let payload = data.payload();
        assert_eq!(payload[0], 1, "identified flag");
        let factory = be_i32(payload, 1);
        let class = be_i32(payload, 5);
        (data, factory, class)
    }

    #[test]
    fn test_identified_header() {
        let (data, factory, class) = header(&Predicates::always_true());
        assert_eq!(data.partition_hash(), 0);
        assert_eq!(data.type_id(), IDENTIFIED_DATA_SERIALIZABLE_TYPE_ID);
        assert_eq!(factory, PREDICATE_FACTORY_ID);
        assert_eq!(class, class_ids::TRUE_PREDICATE);
        assert_eq!(data.payload().len(), 9);
    }

    #[test]
    fn test_class_ids() {
        let cases: Vec<(Box<dyn Predicate>, i32)> = vec![
            (Box::new(Predicates::sql("a = 1")), 0),
            (Box::new(Predicates::and(vec![])), 1),
            (Box::new(Predicates::between("a", &1i32, &5i32).unwrap()), 2),
            (Box::new(Predicates::equal("a", &1i32).unwrap()), 3),
            (Box::new(Predicates::greater_than("a", &1i32).unwrap()), 4),
            (Box::new(Predicates::like("a", "x%")), 5),
            (Box::new(Predicates::ilike("a", "x%")), 6),
            (Box::new(Predicates::is_in("a", &[1i32, 2]).unwrap()), 7),
            (Box::new(Predicates::instance_of("java.lang.String")), 8),
            (Box::new(Predicates::not_equal("a", "b").unwrap()), 9),
            (Box::new(Predicates::not(Predicates::always_true())), 10),
            (Box::new(Predicates::or(vec![])), 11),
            (Box::new(Predicates::regex("a", "^x")), 12),
            (Box::new(Predicates::always_false()), 13),
            (Box::new(Predicates::always_true()), 14),
            (Box::new(Predicates::paging::<i32, i32>(10).unwrap()), 15),
        ];
        for (predicate, expected) in cases {
            assert_eq!(predicate.class_id(), expected, "{:?}", predicate);
            let (_, _, class) = header(predicate.as_ref());
            assert_eq!(class, expected);
        }
    }

    #[test]
    fn test_equal_layout() {
        let data = Predicates::equal("name", "bob").unwrap().to_data().unwrap();
        let fields = &data.payload()[9..];

        let mut expected = ObjectDataOutput::new();
        expected.write_string("name").unwrap();
        expected.write_object(&"bob".to_string()).unwrap();
        assert_eq!(fields, expected.as_bytes());
    }

    #[test]
    fn test_greater_less_flags() {
        let cases = [
            (Predicates::greater_than("a", &1i32).unwrap(), false, false),
            (Predicates::greater_equal("a", &1i32).unwrap(), true, false),
            (Predicates::less_than("a", &1i32).unwrap(), false, true),
            (Predicates::less_equal("a", &1i32).unwrap(), true, true),
        ];
        for (predicate, equal, less) in cases {
            assert_eq!(predicate.is_equal(), equal);
            assert_eq!(predicate.is_less(), less);
            let data = predicate.to_data().unwrap();
            let payload = data.payload();
            assert_eq!(payload[payload.len() - 2], equal as u8);
            assert_eq!(payload[payload.len() - 1], less as u8);
        }
    }

    #[test]
    fn test_between_writes_upper_bound_first() {
        let data = Predicates::between("age", &18i32, &65i32).unwrap().to_data().unwrap();
        let fields = &data.payload()[9..];

        let mut expected = ObjectDataOutput::new();
        expected.write_string("age").unwrap();
        expected.write_object(&65i32).unwrap();
        expected.write_object(&18i32).unwrap();
        assert_eq!(fields, expected.as_bytes());
    }

    #[test]
    fn test_in_writes_count_then_values() {
        let data = Predicates::is_in("id", &[1i64, 2, 3]).unwrap().to_data().unwrap();
        let fields = &data.payload()[9..];
        // "id": 4-byte length + 2 bytes
        assert_eq!(be_i32(fields, 6), 3);
        // each long: 4-byte type id + 8 bytes
        assert_eq!(fields.len(), 6 + 4 + 3 * 12);
    }

    #[test]
    fn test_nested_predicates() {
        let and = AndPredicate::of(
            Predicates::equal("a", &1i32).unwrap(),
            Predicates::not(Predicates::sql("b = 2")),
        );
        let data = and.to_data().unwrap();
        let fields = &data.payload()[9..];

        let mut expected = ObjectDataOutput::new();
        expected.write_int(2).unwrap();
        expected
            .write_object(&PredicateObject(&Predicates::equal("a", &1i32).unwrap()))
            .unwrap();
        expected
            .write_object(&PredicateObject(&Predicates::not(Predicates::sql("b = 2"))))
            .unwrap();
        assert_eq!(fields, expected.as_bytes());

        // nested object header: identified type id, flag, factory, class
        assert_eq!(be_i32(fields, 4), IDENTIFIED_DATA_SERIALIZABLE_TYPE_ID);
        assert_eq!(fields[8], 1);
        assert_eq!(be_i32(fields, 9), PREDICATE_FACTORY_ID);
        assert_eq!(be_i32(fields, 13), class_ids::EQUAL_PREDICATE);
    }

    #[test]
    fn test_like_and_regex_strings() {
        let data = Predicates::like("name", "J%").to_data().unwrap();
        let mut expected = ObjectDataOutput::new();
        expected.write_string("name").unwrap();
        expected.write_string("J%").unwrap();
        assert_eq!(&data.payload()[9..], expected.as_bytes());

        let regex = Predicates::regex("name", "^J.*").to_data().unwrap();
        assert_eq!(be_i32(regex.payload(), 5), class_ids::REGEX_PREDICATE);
    }
}
