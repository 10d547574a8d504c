// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use std::os::raw::c_char;

/// Installs the compact fmt subscriber. `RUST_LOG` wins; `info` otherwise.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Reads a fixed-size, NUL-terminated driver string (layer, extension or
/// device name) without trusting the terminator to be present.
pub fn raw_name(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(s: &str) -> [c_char; 16] {
        let mut out = [0 as c_char; 16];
        for (dst, b) in out.iter_mut().zip(s.bytes()) {
            *dst = b as c_char;
        }
        out
    }

    #[test]
    fn raw_name_stops_at_nul() {
        assert_eq!(raw_name(&fixed("VK_KHR_surface")), "VK_KHR_surface");
    }

    #[test]
    fn raw_name_without_terminator_reads_whole_buffer() {
        let full = fixed("0123456789abcdef");
        assert_eq!(raw_name(&full), "0123456789abcdef");
    }

    #[test]
    fn raw_name_of_zeroed_buffer_is_empty() {
        assert_eq!(raw_name(&[0; 8]), "");
    }
}
