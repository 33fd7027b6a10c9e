//! Builtin recipes for the libraries this tool ships knowledge for.
//!
//! The candidate directory lists are ordered by where each library's build
//! is known to drop its outputs; `{config}` covers multi-config generators
//! that add a Release/Debug subdirectory.

use crate::recipe::{ArtifactSpec, GeneratedHeader, HeaderDir, Recipe};

/// Names of all builtin recipes.
pub fn builtin_names() -> &'static [&'static str] {
    &["webp", "draco", "libuv"]
}

/// Look up a builtin recipe by name.
pub fn builtin(name: &str) -> Option<Recipe> {
    match name {
        "webp" => Some(webp()),
        "draco" => Some(draco()),
        "libuv" => Some(libuv()),
        _ => None,
    }
}

fn spec(name: &str, required: bool, exclude: &[&str]) -> ArtifactSpec {
    ArtifactSpec {
        name: name.to_string(),
        required,
        candidate_dirs: vec![
            "".to_string(),
            "src".to_string(),
            "sharpyuv".to_string(),
            "{config}".to_string(),
        ],
        alt_names: vec![],
        exclude: exclude.iter().map(|s| s.to_string()).collect(),
        win_name: None,
    }
}

/// libwebp: WebP image encoding/decoding, five static libraries.
pub fn webp() -> Recipe {
    Recipe {
        name: "webp".into(),
        git_url: "https://chromium.googlesource.com/webm/libwebp.git".into(),
        default_branch: "main".into(),
        cmake_defines: [
            "-DWEBP_BUILD_ANIM_UTILS=OFF",
            "-DWEBP_BUILD_CWEBP=OFF",
            "-DWEBP_BUILD_DWEBP=OFF",
            "-DWEBP_BUILD_GIF2WEBP=OFF",
            "-DWEBP_BUILD_IMG2WEBP=OFF",
            "-DWEBP_BUILD_VWEBP=OFF",
            "-DWEBP_BUILD_WEBPINFO=OFF",
            "-DWEBP_BUILD_WEBPMUX=OFF",
            "-DWEBP_BUILD_EXTRAS=OFF",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        artifacts: vec![
            // "webp" alone would fuzzy-match its sibling libraries.
            spec("webp", true, &["decoder", "demux", "mux", "sharpyuv"]),
            spec("webpdecoder", false, &[]),
            spec("webpdemux", false, &[]),
            spec("webpmux", false, &["demux"]),
            spec("sharpyuv", false, &[]),
        ],
        headers: vec![
            HeaderDir {
                source: "src/webp".into(),
                dest: "webp".into(),
            },
            HeaderDir {
                source: "sharpyuv".into(),
                dest: "sharpyuv".into(),
            },
        ],
        generated_header: None,
    }
}

/// draco: 3D mesh/point-cloud compression, one static library plus a
/// configure-generated feature header.
pub fn draco() -> Recipe {
    let header_dirs = [
        "compression",
        "core",
        "mesh",
        "point_cloud",
        "attributes",
        "metadata",
    ];

    let mut headers = vec![HeaderDir {
        source: "src/draco".into(),
        dest: "draco".into(),
    }];
    headers.extend(header_dirs.iter().map(|d| HeaderDir {
        source: format!("src/draco/{}", d),
        dest: format!("draco/{}", d),
    }));

    Recipe {
        name: "draco".into(),
        git_url: "https://github.com/google/draco.git".into(),
        default_branch: "1.5.7".into(),
        cmake_defines: [
            "-DDRACO_MESH_COMPRESSION=ON",
            "-DDRACO_POINT_CLOUD_COMPRESSION=ON",
            "-DDRACO_JAVASCRIPT_GLUE=OFF",
            "-DDRACO_WASM=OFF",
            "-DDRACO_ANIMATION_ENCODING=OFF",
            "-DDRACO_TRANSCODER=OFF",
            "-DDRACO_TESTS=OFF",
            "-DDRACO_BUILD_TOOLS=OFF",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        artifacts: vec![ArtifactSpec {
            name: "draco".into(),
            required: true,
            candidate_dirs: vec!["".into(), "{config}".into()],
            alt_names: vec![],
            // The encoder library sits right next to the one we want.
            exclude: vec!["encoder".into()],
            win_name: None,
        }],
        headers,
        generated_header: Some(GeneratedHeader {
            canonical: "draco/draco_features.h".into(),
            file_name: "draco_features.h".into(),
            dest: "draco/draco_features.h".into(),
        }),
    }
}

/// libuv: asynchronous I/O, one static library under a `_a` build name.
pub fn libuv() -> Recipe {
    Recipe {
        name: "libuv".into(),
        git_url: "https://github.com/libuv/libuv.git".into(),
        default_branch: "v1.51.0".into(),
        cmake_defines: [
            "-DLIBUV_BUILD_TESTS=OFF",
            "-DLIBUV_BUILD_BENCH=OFF",
            "-DBUILD_TESTING=OFF",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        artifacts: vec![ArtifactSpec {
            name: "uv".into(),
            required: true,
            candidate_dirs: vec!["".into(), "{config}".into()],
            alt_names: vec!["libuv_a.a".into(), "uv_a.lib".into(), "libuv.a".into()],
            exclude: vec![],
            win_name: Some("libuv.lib".into()),
        }],
        headers: vec![
            HeaderDir {
                source: "include".into(),
                dest: "".into(),
            },
            HeaderDir {
                source: "include/uv".into(),
                dest: "uv".into(),
            },
        ],
        generated_header: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_resolves() {
        for name in builtin_names() {
            let recipe = builtin(name).unwrap();
            assert!(!recipe.artifacts.is_empty(), "{name} has no artifacts");
            assert!(
                recipe.required_artifacts().count() >= 1,
                "{name} has no required artifact"
            );
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(builtin("zlib").is_none());
    }

    #[test]
    fn webp_primary_excludes_siblings() {
        let recipe = webp();
        let primary = &recipe.artifacts[0];
        assert!(primary.required);
        assert!(primary.exclude.contains(&"decoder".to_string()));
    }

    #[test]
    fn draco_declares_its_generated_header() {
        let gh = draco().generated_header.unwrap();
        assert_eq!(gh.file_name, "draco_features.h");
        assert_eq!(gh.canonical, "draco/draco_features.h");
    }
}
