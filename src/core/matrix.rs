//! Target matrix expansion.
//!
//! Turns the raw architecture token list of a request into an ordered,
//! duplicate-free list of concrete build cells. Runs before any external
//! process is spawned so a typo never wastes partial build time.

use crate::core::errors::ForgeError;
use crate::core::platform::{Arch, Platform, UNIVERSAL_TOKEN};
use crate::core::request::{BuildCell, BuildRequest, CrtLinkage};

/// Expand architecture tokens for a platform.
///
/// The aggregate `universal` token expands to the platform's declared
/// constituent pair in declared order. Output order follows input order
/// with duplicates dropped, so downstream composition can assume a stable
/// pairing.
pub fn expand_archs(platform: Platform, tokens: &[String]) -> Result<Vec<Arch>, ForgeError> {
    let mut archs: Vec<Arch> = Vec::new();

    let mut push = |arch: Arch| {
        if !archs.contains(&arch) {
            archs.push(arch);
        }
    };

    for token in tokens {
        let token = token.trim();
        if token == UNIVERSAL_TOKEN {
            match platform.aggregate_group() {
                Some(group) => group.into_iter().for_each(&mut push),
                None => return Err(invalid(platform, token)),
            }
            continue;
        }

        match Arch::parse(token) {
            Some(arch) if platform.valid_archs().contains(&arch) => push(arch),
            _ => return Err(invalid(platform, token)),
        }
    }

    Ok(archs)
}

/// Expand a request into its ordered build cells.
pub fn expand(request: &BuildRequest) -> Result<Vec<BuildCell>, ForgeError> {
    if request.crt == CrtLinkage::Dynamic && request.platform != Platform::Win {
        return Err(ForgeError::InvalidPlatformCombination {
            platform: request.platform,
            detail: "dynamic C runtime linkage (--crt dynamic) only applies to win".into(),
        });
    }

    let archs = expand_archs(request.platform, &request.archs)?;

    Ok(archs
        .into_iter()
        .map(|arch| BuildCell {
            platform: request.platform,
            arch,
            config: request.config,
            crt: request.crt,
        })
        .collect())
}

/// Whether the expanded matrix covers every constituent of the platform's
/// aggregate group, i.e. whether universal composition should run.
///
/// This holds both when `universal` was requested and when the pair was
/// spelled out explicitly.
pub fn covers_aggregate_group(platform: Platform, archs: &[Arch]) -> bool {
    match platform.aggregate_group() {
        Some(group) => group.iter().all(|a| archs.contains(a)),
        None => false,
    }
}

fn invalid(platform: Platform, token: &str) -> ForgeError {
    let mut valid: Vec<String> = platform
        .valid_archs()
        .iter()
        .map(|a| a.to_string())
        .collect();
    if platform.aggregate_group().is_some() {
        valid.push(UNIVERSAL_TOKEN.to_string());
    }
    ForgeError::InvalidArchitecture {
        platform,
        token: token.to_string(),
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn universal_expands_to_constituents_in_declared_order() {
        let archs = expand_archs(Platform::Mac, &tokens(&["universal"])).unwrap();
        assert_eq!(archs, vec![Arch::X86_64, Arch::Arm64]);
    }

    #[test]
    fn expansion_deduplicates_preserving_order() {
        let archs =
            expand_archs(Platform::Mac, &tokens(&["arm64", "universal", "arm64"])).unwrap();
        assert_eq!(archs, vec![Arch::Arm64, Arch::X86_64]);
    }

    #[test]
    fn universal_is_invalid_off_mac() {
        let err = expand_archs(Platform::Linux, &tokens(&["universal"])).unwrap_err();
        match err {
            ForgeError::InvalidArchitecture { token, .. } => assert_eq!(token, "universal"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn whitelist_rejects_foreign_arch() {
        // wasm32 parses fine but only the wasm platform accepts it.
        let err = expand_archs(Platform::Linux, &tokens(&["wasm32"])).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidArchitecture { .. }));
    }

    #[test]
    fn tokens_are_trimmed() {
        let archs = expand_archs(Platform::Linux, &tokens(&[" x64", "arm64 "])).unwrap();
        assert_eq!(archs, vec![Arch::X86_64, Arch::Arm64]);
    }

    #[test]
    fn x64_alias_validates_on_mac() {
        let archs = expand_archs(Platform::Mac, &tokens(&["x64", "arm64"])).unwrap();
        assert_eq!(archs, vec![Arch::X86_64, Arch::Arm64]);
    }

    #[test]
    fn dynamic_crt_is_rejected_off_windows() {
        let request = BuildRequest {
            platform: Platform::Linux,
            archs: tokens(&["x64"]),
            config: crate::core::request::BuildConfig::Release,
            crt: CrtLinkage::Dynamic,
            intent: crate::core::request::TargetIntent::All,
            out: "build".into(),
            branch: None,
            ndk: None,
            shallow: false,
        };

        let err = expand(&request).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidPlatformCombination { .. }));

        let mut on_win = request;
        on_win.platform = Platform::Win;
        assert_eq!(expand(&on_win).unwrap().len(), 1);
    }

    #[test]
    fn explicit_pair_covers_aggregate_group() {
        let archs = expand_archs(Platform::Mac, &tokens(&["x64", "arm64"])).unwrap();
        assert!(covers_aggregate_group(Platform::Mac, &archs));

        let single = expand_archs(Platform::Mac, &tokens(&["arm64"])).unwrap();
        assert!(!covers_aggregate_group(Platform::Mac, &single));

        let linux = expand_archs(Platform::Linux, &tokens(&["x64", "arm64"])).unwrap();
        assert!(!covers_aggregate_group(Platform::Linux, &linux));
    }
}
