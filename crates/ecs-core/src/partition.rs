//! Splitting a service list into request-sized batches

use std::num::NonZeroUsize;

use crate::types::ServiceName;

/// Most services a single describe request may name
pub const MAX_SERVICES_PER_REQUEST: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// An ordered, non-empty group of services sent in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch(Vec<ServiceName>);

impl Batch {
    /// Services in this batch, in input order
    pub fn services(&self) -> &[ServiceName] {
        &self.0
    }

    /// Number of services in the batch (always at least one)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no services
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the service names out of the batch
    pub fn into_inner(self) -> Vec<ServiceName> {
        self.0
    }
}

/// Split `items` into batches of at most `limit` services.
///
/// Every batch but the last holds exactly `limit` services. Order is kept
/// within and across batches, and an empty input yields no batches at all.
pub fn partition(items: Vec<ServiceName>, limit: NonZeroUsize) -> Vec<Batch> {
    let limit = limit.get();
    let mut batches = Vec::with_capacity(items.len().div_ceil(limit));
    let mut current = Vec::with_capacity(limit.min(items.len()));

    for item in items {
        current.push(item);
        if current.len() == limit {
            batches.push(Batch(std::mem::replace(
                &mut current,
                Vec::with_capacity(limit),
            )));
        }
    }

    if !current.is_empty() {
        batches.push(Batch(current));
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<ServiceName> {
        (1..=count).map(|i| ServiceName::new(format!("s{}", i))).collect()
    }

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_partition_twenty_five_into_three() {
        let batches = partition(names(25), MAX_SERVICES_PER_REQUEST);
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_partition_empty_input_has_no_batches() {
        assert!(partition(Vec::new(), MAX_SERVICES_PER_REQUEST).is_empty());
    }

    #[test]
    fn test_partition_exact_multiple_has_no_trailing_batch() {
        let batches = partition(names(20), MAX_SERVICES_PER_REQUEST);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 10));
    }

    #[test]
    fn test_partition_preserves_order_and_contents() {
        for count in 0..=35 {
            for size in 1..=12 {
                let input = names(count);
                let batches = partition(input.clone(), limit(size));

                assert_eq!(batches.len(), count.div_ceil(size));
                assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= size));

                let joined: Vec<ServiceName> =
                    batches.into_iter().flat_map(Batch::into_inner).collect();
                assert_eq!(joined, input);
            }
        }
    }

    #[test]
    fn test_partition_limit_of_one() {
        let batches = partition(names(3), limit(1));
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].services(), &[ServiceName::from("s3")]);
    }
}
