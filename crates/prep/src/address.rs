//! Address line layout.

/// The six address columns the shuffle works on, in order.
pub const ADDRESS_LINES: [&str; 6] = [
    "Address1", "Address2", "Address3", "Address4", "Address5", "Address6",
];

/// Address columns cleaned of commas and postcode fragments.
pub const MAX_ADDRESS_LINES: usize = 9;

/// Push address lines towards `Address6` so the locality always ends up in
/// the last line.
///
/// Runs only when `Address2` has content. Each step shifts lines 3..=5 one
/// slot right; a non-numeric `Address2` (a house name rather than a street
/// number) moves down into `Address3` as it goes. Stops once `Address6` is
/// filled or lines 3..=6 are all empty.
pub fn shuffle_address_lines(lines: &mut [String; 6]) {
    if lines[1].is_empty() {
        return;
    }
    while lines[5].is_empty() && lines[2..].iter().any(|l| !l.is_empty()) {
        lines[5] = std::mem::take(&mut lines[4]);
        lines[4] = std::mem::take(&mut lines[3]);
        lines[3] = std::mem::take(&mut lines[2]);
        let house_name = lines[1]
            .chars()
            .next()
            .is_some_and(|c| !c.is_numeric());
        if house_name {
            lines[2] = std::mem::take(&mut lines[1]);
        }
    }
}
