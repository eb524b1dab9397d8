/// Runtime checks for engine invariants.
///
/// Violations are fatal: drawing into a surface that is not there, or presenting
/// a surface that is still locked, means the lifecycle is broken.

#[cold]
#[inline(never)]
fn violation(msg: &str) -> ! {
    panic!("ENGINE INVARIANT VIOLATION: {msg}");
}

/// Panic if a required invariant is false.
#[inline]
pub fn require(cond: bool, msg: &str) {
    if !cond {
        violation(msg);
    }
}

/// Panic if an impossible state transition happens.
#[inline]
pub fn bad_state(msg: &str) -> ! {
    violation(msg)
}
