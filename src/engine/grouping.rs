use chrono::Duration;

use crate::model::Order;

use super::address::{AddressMatcher, SubstringStreetMatcher};

/// Group `orders` into clusters on the same street placed within `window` of
/// each other, using the substring street heuristic.
pub fn group_by_location_and_time<'a>(
    orders: &'a [Order],
    window: Duration,
) -> Vec<Vec<&'a Order>> {
    group_with(orders, window, &SubstringStreetMatcher)
}

/// Greedy single pass in input order.
///
/// Each unclaimed order seeds a group and claims every later unclaimed order
/// that matches the seed (not the other members). Since the matcher may not
/// be transitive, the result depends on input order. Every order lands in
/// exactly one group. Quadratic in the number of orders.
pub fn group_with<'a, M>(
    orders: &'a [Order],
    window: Duration,
    matcher: &M,
) -> Vec<Vec<&'a Order>>
where
    M: AddressMatcher + ?Sized,
{
    let mut claimed = vec![false; orders.len()];
    let mut groups = Vec::new();

    for (i, seed) in orders.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut group = vec![seed];

        for (j, other) in orders.iter().enumerate() {
            if claimed[j] {
                continue;
            }
            let apart = (seed.created_at - other.created_at).abs();
            if apart <= window && matcher.is_match(&seed.delivery_address, &other.delivery_address)
            {
                claimed[j] = true;
                group.push(other);
            }
        }

        groups.push(group);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::address::StreetKeyMatcher;
    use crate::engine::test_utils::order;

    fn ids(groups: &[Vec<&Order>]) -> Vec<Vec<u64>> {
        groups
            .iter()
            .map(|g| g.iter().map(|o| o.id).collect())
            .collect()
    }

    #[test]
    fn groups_same_street_within_window() {
        let orders = vec![
            order(0, "7 Freedom Way, Lekki", "Lekki", 10, 0),
            order(1, "7 Freedom Way, VI", "VI", 10, 5),
            order(2, "10 Broad St, Lagos", "Lagos Island", 10, 1),
        ];
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));
        assert_eq!(ids(&groups), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let orders = vec![
            order(0, "Freedom Way", "Lekki", 10, 0),
            order(1, "Freedom Way", "Lekki", 10, 15),
            order(2, "Freedom Way", "Lekki", 10, 31),
        ];
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));
        assert_eq!(ids(&groups), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn seed_claims_orders_placed_earlier_in_time() {
        let orders = vec![
            order(0, "Broad St", "Lagos", 10, 0),
            order(1, "Freedom Way", "Lekki", 10, 40),
            order(2, "Freedom Way", "Lekki", 10, 30),
        ];
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));
        assert_eq!(ids(&groups), vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn members_only_match_the_seed() {
        // east and west both match the seed but not each other
        let orders = vec![
            order(0, "Freedom Way", "Lekki", 10, 0),
            order(1, "Freedom Way East", "Lekki", 10, 1),
            order(2, "Freedom Way West", "Lekki", 10, 2),
        ];
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));
        assert_eq!(ids(&groups), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn grouping_depends_on_input_order() {
        let orders = vec![
            order(1, "Freedom Way East", "Lekki", 10, 1),
            order(2, "Freedom Way West", "Lekki", 10, 2),
            order(0, "Freedom Way", "Lekki", 10, 0),
        ];
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));
        assert_eq!(ids(&groups), vec![vec![1, 0], vec![2]]);
    }

    #[test]
    fn strict_matcher_splits_substring_streets() {
        let orders = vec![
            order(0, "Freedom Way", "Lekki", 10, 0),
            order(1, "Freedom Way East", "Lekki", 10, 1),
            order(2, "No. 4 Freedom Way", "Lekki", 10, 2),
        ];
        let groups = group_with(&orders, Duration::minutes(15), &StreetKeyMatcher);
        assert_eq!(ids(&groups), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn every_order_lands_in_exactly_one_group() {
        let orders: Vec<_> = (0..12)
            .map(|i| {
                let street = ["Freedom Way", "Broad St", "Freedom Way East"][i % 3];
                order(i as u64, street, "Lekki", 10, (i as i64) * 4)
            })
            .collect();
        let groups = group_by_location_and_time(&orders, Duration::minutes(15));

        let mut seen: Vec<u64> = groups.iter().flatten().map(|o| o.id).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert!(groups.iter().all(|g| !g.is_empty()));
    }

    #[test]
    fn empty_input_has_no_groups() {
        let groups = group_by_location_and_time(&[], Duration::minutes(15));
        assert!(groups.is_empty());
    }
}
