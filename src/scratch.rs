//! Scratch register selection for pseudo-instruction expansion.
//!
//! Candidates are tried in the table's canonical register order, so the
//! lowest free register always wins and generated code is reproducible.
//! Membership in the used set is an exact, case-sensitive string match.

use tracing::debug;

use crate::arch::Architecture;

fn is_used<T: AsRef<str>>(used: &[T], name: &str) -> bool {
    used.iter().any(|u| u.as_ref() == name)
}

/// First register not in `used`, or `None` when every register is taken.
pub fn select_free<'a, T: AsRef<str>>(arch: &'a Architecture, used: &[T]) -> Option<&'a str> {
    let free = arch.register_names().find(|name| !is_used(used, name));
    debug!(?free, "scratch register selection");
    free
}

/// `n` distinct free registers in canonical order, or `None` if fewer exist.
pub fn select_free_many<'a, T: AsRef<str>>(
    arch: &'a Architecture,
    used: &[T],
    n: usize,
) -> Option<Vec<&'a str>> {
    let free: Vec<&str> = arch
        .register_names()
        .filter(|name| !is_used(used, name))
        .take(n)
        .collect();
    (free.len() == n).then_some(free)
}

/// Number of registers left over once `used` is excluded.
pub fn free_count<T: AsRef<str>>(arch: &Architecture, used: &[T]) -> usize {
    arch.register_names().filter(|name| !is_used(used, name)).count()
}
