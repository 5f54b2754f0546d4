#[inline(always)]
pub unsafe fn eq_mask_8x32(block: &[i32; 8], target: i32) -> u8 {
    use core::arch::x86_64::*;

    unsafe {
        let needle = _mm256_set1_epi32(target);
        let lanes = _mm256_loadu_si256(block.as_ptr() as *const __m256i);
        let eq = _mm256_cmpeq_epi32(lanes, needle);

        // one sign bit per 32-bit lane
        _mm256_movemask_ps(_mm256_castsi256_ps(eq)) as u8
    }
}
