cfg_if::cfg_if! {
    if #[cfg(target_feature = "avx2")] {
        mod avx2;
        pub use avx2::*;
    } else {
        mod sse2;
        pub use sse2::*;
    }
}
