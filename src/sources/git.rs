//! Git source - library source trees from git repositories.
//!
//! Each (remote, reference) pair gets its own checkout directory under the
//! cache root, so switching branches never leaves a dirty tree behind.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use git2::{build::RepoBuilder, FetchOptions, Repository, ResetType};
use url::Url;

use crate::util::hash::sha256_str;

/// Provides a library source tree for a (remote, reference) pair.
///
/// The seam between the build driver and source acquisition; tests
/// substitute a provider that returns a prepared directory.
pub trait SourceProvider {
    fn checkout(
        &self,
        remote: &str,
        reference: &str,
        shallow: bool,
        cache_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Checks sources out of git, one directory per (remote, reference).
#[derive(Debug, Default)]
pub struct GitSourceProvider;

impl SourceProvider for GitSourceProvider {
    fn checkout(
        &self,
        remote: &str,
        reference: &str,
        shallow: bool,
        cache_dir: &Path,
    ) -> Result<PathBuf> {
        GitSource::new(remote, reference, shallow, cache_dir)?.ensure()
    }
}

/// A source checkout for one library at one reference.
pub struct GitSource {
    /// Remote repository URL
    remote: Url,

    /// Branch or tag to build
    reference: String,

    /// Shallow clone/fetch
    shallow: bool,

    /// Local checkout path
    checkout_path: PathBuf,
}

impl GitSource {
    /// Create a new git source under the given cache directory.
    pub fn new(remote: &str, reference: &str, shallow: bool, cache_dir: &Path) -> Result<Self> {
        let remote = Url::parse(remote)
            .with_context(|| format!("invalid git remote url: {}", remote))?;

        let dir_name = format!(
            "{}-{}",
            sanitize_url_for_path(&remote),
            &sha256_str(&format!("{}#{}", remote, reference))[..8]
        );
        let checkout_path = cache_dir.join("src").join(dir_name);

        Ok(GitSource {
            remote,
            reference: reference.to_string(),
            shallow,
            checkout_path,
        })
    }

    /// Path of the local checkout.
    pub fn checkout_path(&self) -> &Path {
        &self.checkout_path
    }

    /// Clone or open, fetch the reference, then pin the working tree to
    /// it. Returns the checkout path.
    pub fn ensure(&self) -> Result<PathBuf> {
        let repo = if self.checkout_path.exists() {
            self.open()?
        } else {
            self.clone()?
        };

        self.fetch_reference(&repo)?;
        self.pin(&repo)?;
        Ok(self.checkout_path.clone())
    }

    fn fetch_options(&self) -> FetchOptions<'_> {
        let mut opts = FetchOptions::new();
        if self.shallow {
            opts.depth(1);
        }
        opts
    }

    fn clone(&self) -> Result<Repository> {
        tracing::info!("cloning {} ({})", self.remote, self.reference);

        if let Some(parent) = self.checkout_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        RepoBuilder::new()
            .fetch_options(self.fetch_options())
            .clone(self.remote.as_str(), &self.checkout_path)
            .with_context(|| format!("failed to clone {}", self.remote))
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.checkout_path).with_context(|| {
            format!(
                "failed to open git repository: {}",
                self.checkout_path.display()
            )
        })
    }

    fn fetch_reference(&self, repo: &Repository) -> Result<()> {
        tracing::info!("fetching `{}` from {}", self.reference, self.remote);

        let mut remote = repo.find_remote("origin")?;
        let refspecs = [
            format!("refs/heads/{0}:refs/remotes/origin/{0}", self.reference),
            format!("refs/tags/{0}:refs/tags/{0}", self.reference),
        ];
        // One of the two refspecs may not exist; try branch first.
        if remote
            .fetch(&refspecs[..1], Some(&mut self.fetch_options()), None)
            .is_err()
        {
            remote
                .fetch(&refspecs[1..], Some(&mut self.fetch_options()), None)
                .with_context(|| {
                    format!("failed to fetch `{}` from {}", self.reference, self.remote)
                })?;
        }

        Ok(())
    }

    /// Hard reset the working tree to the requested reference.
    fn pin(&self, repo: &Repository) -> Result<()> {
        let commit = self
            .find_commit(repo)
            .with_context(|| format!("reference `{}` not found in {}", self.reference, self.remote))?;

        repo.reset(commit.as_object(), ResetType::Hard, None)
            .with_context(|| format!("failed to reset to `{}`", self.reference))?;

        Ok(())
    }

    fn find_commit<'r>(&self, repo: &'r Repository) -> Result<git2::Commit<'r>> {
        // Tag, remote branch, then local branch.
        let candidates = [
            format!("refs/tags/{}", self.reference),
            format!("refs/remotes/origin/{}", self.reference),
            format!("refs/heads/{}", self.reference),
        ];

        for name in &candidates {
            if let Ok(reference) = repo.find_reference(name) {
                return Ok(reference.peel_to_commit()?);
            }
        }

        bail!("no tag or branch `{}`", self.reference)
    }
}

fn sanitize_url_for_path(url: &Url) -> String {
    let base = url
        .path_segments()
        .and_then(|mut s| s.next_back())
        .unwrap_or("repo")
        .trim_end_matches(".git");

    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '-'
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn checkout_dirs_are_unique_per_reference() {
        let tmp = TempDir::new().unwrap();
        let a = GitSource::new(
            "https://github.com/google/draco.git",
            "1.5.7",
            false,
            tmp.path(),
        )
        .unwrap();
        let b = GitSource::new(
            "https://github.com/google/draco.git",
            "main",
            false,
            tmp.path(),
        )
        .unwrap();

        assert_ne!(a.checkout_path(), b.checkout_path());
        assert!(a
            .checkout_path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("draco-"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(GitSource::new("not a url", "main", false, tmp.path()).is_err());
    }
}
