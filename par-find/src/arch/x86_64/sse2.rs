// SSE2 is part of the x86_64 baseline, so this is the floor for the target.
#[inline(always)]
pub unsafe fn eq_mask_8x32(block: &[i32; 8], target: i32) -> u8 {
    use core::arch::x86_64::*;

    unsafe {
        let needle = _mm_set1_epi32(target);
        let lo = _mm_loadu_si128(block.as_ptr() as *const __m128i);
        let hi = _mm_loadu_si128(block.as_ptr().add(4) as *const __m128i);

        let lo_bits = _mm_movemask_ps(_mm_castsi128_ps(_mm_cmpeq_epi32(lo, needle))) as u8;
        let hi_bits = _mm_movemask_ps(_mm_castsi128_ps(_mm_cmpeq_epi32(hi, needle))) as u8;

        lo_bits | (hi_bits << 4)
    }
}
