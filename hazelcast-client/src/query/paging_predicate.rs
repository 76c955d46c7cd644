//! Paging predicate for paginated query results.
//!
//! A paging predicate fetches query results one page at a time. The member
//! returns an anchor with every page, the last entry of the pages it has
//! seen, and the next request sends those anchors back so the member can
//! resume from the nearest one instead of sorting the whole result again.

use std::fmt::Debug;

use hazelcast_protocol::protocol::custom::{AnchorDataListHolder, PagingPredicateHolder};
use hazelcast_protocol::serialization::{DataOutput, ObjectDataOutput};
use hazelcast_protocol::{Data, FromData, HazelcastError, Result, ToData};

use super::{class_ids, invalid_argument, Predicate, PredicateObject};

/// Iteration type for paging predicate results.
///
/// Determines what the member returns and what the ordering applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IterationType {
    /// Iterate over keys only.
    Key = 0,
    /// Iterate over values only.
    Value = 1,
    /// Iterate over entries (key-value pairs).
    #[default]
    Entry = 2,
}

impl IterationType {
    /// Returns the id sent in a [`PagingPredicateHolder`].
    pub fn id(self) -> i8 {
        self as i8
    }

    /// Returns the name written in the serialized predicate.
    pub fn name(self) -> &'static str {
        match self {
            IterationType::Key => "KEY",
            IterationType::Value => "VALUE",
            IterationType::Entry => "ENTRY",
        }
    }

    /// Looks up an iteration type by id.
    pub fn from_id(id: i8) -> Option<Self> {
        match id {
            0 => Some(IterationType::Key),
            1 => Some(IterationType::Value),
            2 => Some(IterationType::Entry),
            _ => None,
        }
    }
}

/// A predicate that splits the results of an inner predicate into pages.
///
/// `K` and `V` are the key and value types of the queried map; anchors are
/// kept deserialized as `(nearest_page, (key, value))` in the order the
/// member returned them.
///
/// Not thread-safe: the page, anchors and iteration type are plain fields
/// with no synchronization, and one instance must not be shared between
/// concurrent queries. Call [`reset`](Self::reset) before reusing it for an
/// unrelated query.
///
/// # Example
///
/// ```ignore
/// use hazelcast_client::query::{PagingPredicate, Predicates};
///
/// let mut predicate: PagingPredicate<String, i32> =
///     PagingPredicate::with_predicate(Predicates::greater_than("age", &18i32)?, 25)?;
///
/// predicate.next_page();     // page 1
/// predicate.next_page();     // page 2
/// predicate.previous_page(); // page 1
/// predicate.set_page(5)?;    // page 5
/// ```
pub struct PagingPredicate<K, V> {
    inner: Option<Box<dyn Predicate>>,
    comparator: Option<Data>,
    page_size: i32,
    page: i32,
    iteration_type: IterationType,
    anchors: Vec<(i32, (K, V))>,
}

impl<K: Debug, V: Debug> Debug for PagingPredicate<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingPredicate")
            .field("inner", &self.inner)
            .field("page_size", &self.page_size)
            .field("page", &self.page)
            .field("iteration_type", &self.iteration_type)
            .field("has_comparator", &self.comparator.is_some())
            .field("anchors", &self.anchors)
            .finish()
    }
}

impl<K, V> PagingPredicate<K, V> {
    /// Creates a paging predicate over all entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `page_size` is not positive.
    pub fn new(page_size: i32) -> Result<Self> {
        Self::build(None, page_size)
    }

    /// Creates a paging predicate over the entries matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `page_size` is not positive or if
    /// `predicate` is itself a paging predicate.
    pub fn with_predicate<P: Predicate + 'static>(predicate: P, page_size: i32) -> Result<Self> {
        Self::build(Some(Box::new(predicate)), page_size)
    }

    fn build(inner: Option<Box<dyn Predicate>>, page_size: i32) -> Result<Self> {
        if inner
            .as_ref()
            .is_some_and(|p| p.class_id() == class_ids::PAGING_PREDICATE)
        {
            return Err(invalid_argument("nested paging predicate is not supported"));
        }
        if page_size <= 0 {
            return Err(invalid_argument(format!(
                "page_size must be greater than 0, got {}",
                page_size
            )));
        }
        Ok(Self {
            inner,
            comparator: None,
            page_size,
            page: 0,
            iteration_type: IterationType::Entry,
            anchors: Vec::new(),
        })
    }

    /// Orders results with a comparator known to the member.
    pub fn with_comparator<C: ToData + ?Sized>(mut self, comparator: &C) -> Result<Self> {
        self.comparator = Some(comparator.to_data()?);
        Ok(self)
    }

    /// Returns the number of entries per page.
    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Returns the current page, zero-based.
    pub fn page(&self) -> i32 {
        self.page
    }

    /// Jumps to `page`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative page; the current page is
    /// left unchanged.
    pub fn set_page(&mut self, page: i32) -> Result<()> {
        if page < 0 {
            return Err(invalid_argument(format!(
                "page must be positive or 0, got {}",
                page
            )));
        }
        self.page = page;
        Ok(())
    }

    /// Advances to the next page and returns it.
    ///
    /// A page past the data comes back empty. Stays on `i32::MAX`.
    pub fn next_page(&mut self) -> i32 {
        self.page = self.page.saturating_add(1);
        self.page
    }

    /// Goes back one page and returns it. Stays on page 0.
    pub fn previous_page(&mut self) -> i32 {
        if self.page > 0 {
            self.page -= 1;
        }
        self.page
    }

    /// Returns to page 0, drops all anchors and restores the entry
    /// iteration type.
    pub fn reset(&mut self) {
        self.page = 0;
        self.anchors.clear();
        self.iteration_type = IterationType::Entry;
    }

    /// Returns the iteration type.
    pub fn iteration_type(&self) -> IterationType {
        self.iteration_type
    }

    /// Sets the iteration type to match the paging query being sent.
    pub fn set_iteration_type(&mut self, iteration_type: IterationType) {
        self.iteration_type = iteration_type;
    }

    /// Returns the inner predicate, if any.
    pub fn predicate(&self) -> Option<&dyn Predicate> {
        self.inner.as_deref()
    }

    /// Returns the serialized comparator, if any.
    pub fn comparator(&self) -> Option<&Data> {
        self.comparator.as_ref()
    }

    /// Returns the anchors as `(nearest_page, (key, value))`.
    pub fn anchor_list(&self) -> &[(i32, (K, V))] {
        &self.anchors
    }

    /// Replaces the anchors.
    pub fn set_anchor_list(&mut self, anchors: Vec<(i32, (K, V))>) {
        self.anchors = anchors;
    }

    /// Returns the anchor of the highest page not after the current one.
    pub fn nearest_anchor(&self) -> Option<&(i32, (K, V))> {
        self.anchors
            .iter()
            .filter(|(page, _)| *page <= self.page)
            .max_by_key(|(page, _)| *page)
    }
}

impl<K: FromData, V: FromData> PagingPredicate<K, V> {
    /// Replaces the anchors with those returned by the member.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the page list and the entry list differ
    /// in length, or the deserialization error of any anchor key or value.
    pub fn update_anchors(&mut self, holder: &AnchorDataListHolder) -> Result<()> {
        if holder.anchor_page_list.len() != holder.anchor_data_list.len() {
            return Err(HazelcastError::Protocol(format!(
                "anchor list has {} pages but {} entries",
                holder.anchor_page_list.len(),
                holder.anchor_data_list.len()
            )));
        }
        let anchors = holder
            .anchor_page_list
            .iter()
            .zip(&holder.anchor_data_list)
            .map(|(page, (key, value))| Ok((*page, (K::from_data(key)?, V::from_data(value)?))))
            .collect::<Result<Vec<_>>>()?;
        tracing::trace!(count = anchors.len(), page = self.page, "updated paging anchors");
        self.anchors = anchors;
        Ok(())
    }
}

impl<K: ToData, V: ToData> PagingPredicate<K, V> {
    /// Builds the wire form sent with paging queries.
    ///
    /// Anchors keep their order; the holder never carries a partition key.
    pub fn to_holder(&self) -> Result<PagingPredicateHolder> {
        let mut anchor_page_list = Vec::with_capacity(self.anchors.len());
        let mut anchor_data_list = Vec::with_capacity(self.anchors.len());
        for (page, (key, value)) in &self.anchors {
            anchor_page_list.push(*page);
            anchor_data_list.push((key.to_data()?, value.to_data()?));
        }

        Ok(PagingPredicateHolder {
            anchor_data_list_holder: AnchorDataListHolder {
                anchor_page_list,
                anchor_data_list,
            },
            predicate_data: self.inner.as_ref().map(|p| p.to_data()).transpose()?,
            comparator_data: self.comparator.clone(),
            page_size: self.page_size,
            page: self.page,
            iteration_type_id: self.iteration_type.id(),
            partition_key_data: None,
        })
    }
}

impl<K, V> Predicate for PagingPredicate<K, V>
where
    K: ToData + Debug + Send + Sync,
    V: ToData + Debug + Send + Sync,
{
    fn class_id(&self) -> i32 {
        class_ids::PAGING_PREDICATE
    }

    fn write_data(&self, output: &mut ObjectDataOutput) -> Result<()> {
        match &self.inner {
            Some(inner) => output.write_object(&PredicateObject(inner.as_ref()))?,
            None => output.write_nullable_object(None)?,
        }
        output.write_nullable_object(self.comparator.as_ref().map(|c| c as &dyn ToData))?;
        output.write_int(self.page)?;
        output.write_int(self.page_size)?;
        output.write_string(self.iteration_type.name())?;
        output.write_int(self.anchors.len() as i32)?;
        for (page, (key, value)) in &self.anchors {
            output.write_int(*page)?;
            output.write_object(key)?;
            output.write_object(value)?;
        }
        Ok(())
    }
}
