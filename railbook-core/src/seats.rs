use std::collections::HashSet;

/// Pick the lowest seat number in `1..=total_seats` that no surviving
/// reservation holds.
///
/// The naive `total_seats - available_seats + 1` formula hands out
/// duplicates once bookings and cancellations interleave (cancelling
/// seat 1 of 2 and booking again would re-issue seat 2). Allocating
/// from the set of seats actually in use keeps seat numbers pairwise
/// distinct per train no matter the interleaving.
pub fn lowest_free_seat(occupied: &[i32], total_seats: i32) -> Option<i32> {
    let taken: HashSet<i32> = occupied.iter().copied().collect();
    (1..=total_seats).find(|seat| !taken.contains(seat))
}
