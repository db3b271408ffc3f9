//! Scratch buffer management.

/// Resizes `buf` to `len` default valued elements, reusing its allocation.
///
/// A buffer that is too small grows to the larger of `len` and twice its
/// previous capacity. Capacity never shrinks.
pub(crate) fn reset_zeroed<T: Copy + Default>(buf: &mut Vec<T>, len: usize) {
    buf.clear();
    if buf.capacity() < len {
        let target = len.max(buf.capacity().saturating_mul(2));
        buf.reserve_exact(target);
    }
    buf.resize(len, T::default());
}
