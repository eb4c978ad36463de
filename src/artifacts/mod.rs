//! Configuration artifact generation
//!
//! Pure renderers for the files the gateway owns, plus the writer that puts
//! them on disk. Every artifact is regenerated and replaced as a whole; the
//! only in-place edit is the exit-region substitution in [`torrc`].

pub mod dhcpcd;
pub mod dnsmasq;
pub mod iptables;
pub mod torrc;

use crate::config::{ConfigPaths, NetworkSettings};
use crate::error::{GatewayError, GatewayResult};
use crate::region::Region;
use crate::topology::Topology;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Renderer input: the fixed network layout plus the chosen exit region
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Lower-case region code as written into torrc
    pub exit_region: String,
    pub network: NetworkSettings,
}

impl ProxyConfig {
    /// Taking a catalog [`Region`] means the exit region is valid by construction
    pub fn new(region: &Region, network: NetworkSettings) -> Self {
        Self {
            exit_region: region.tor_code(),
            network,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    AddressAssignment,
    NameResolution,
    RedirectionV4,
    RedirectionV6,
    AnonymityRouting,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::AddressAssignment => "address assignment (dhcpcd)",
            ArtifactKind::NameResolution => "DHCP/DNS (dnsmasq)",
            ArtifactKind::RedirectionV4 => "IPv4 redirection rules",
            ArtifactKind::RedirectionV6 => "IPv6 filter rules",
            ArtifactKind::AnonymityRouting => "Tor routing (torrc)",
        };
        f.write_str(name)
    }
}

/// A rendered file ready to be written
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub async fn write(&self) -> GatewayResult<()> {
        write_artifact(&self.path, &self.contents, 0o644).await
    }
}

/// Render every provisioning artifact, in write order
pub fn render_all(
    proxy: &ProxyConfig,
    topology: &Topology,
    paths: &ConfigPaths,
) -> GatewayResult<Vec<Artifact>> {
    Ok(vec![
        Artifact {
            kind: ArtifactKind::AddressAssignment,
            path: paths.dhcpcd_conf.clone(),
            contents: dhcpcd::render(proxy, topology)?,
        },
        Artifact {
            kind: ArtifactKind::NameResolution,
            path: paths.dnsmasq_conf.clone(),
            contents: dnsmasq::render(proxy, topology)?,
        },
        Artifact {
            kind: ArtifactKind::RedirectionV4,
            path: paths.rules_v4.clone(),
            contents: iptables::render_v4(proxy, topology)?,
        },
        Artifact {
            kind: ArtifactKind::RedirectionV6,
            path: paths.rules_v6.clone(),
            contents: iptables::render_v6(),
        },
        Artifact {
            kind: ArtifactKind::AnonymityRouting,
            path: paths.torrc.clone(),
            contents: torrc::render(proxy, &paths.tor_log)?,
        },
    ])
}

/// Replace `path` with `contents` in one step
///
/// Writes a sibling temp file and renames it over the target, so a consuming
/// daemon never sees a half-written file.
pub async fn write_artifact(path: &Path, contents: &str, mode: u32) -> GatewayResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let wrap = |source: std::io::Error| GatewayError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(wrap)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".torgate-tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).await.map_err(wrap)?;
    fs::set_permissions(&tmp, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(wrap)?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(wrap(e));
    }

    debug!("Wrote {:?} with permissions {:o}", path, mode);
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::region::RegionDirectory;

    pub fn proxy(code: &str) -> ProxyConfig {
        let region = RegionDirectory::new().lookup(code).unwrap();
        ProxyConfig::new(region, NetworkSettings::default())
    }

    pub fn topology() -> Topology {
        Topology {
            internet_interface: "wlan0".to_string(),
            client_interface: "eth0".to_string(),
            client_link_up: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_artifact_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etc/tor/torrc");

        write_artifact(&path, "first\nsecond\n", 0o644).await.unwrap();
        write_artifact(&path, "third\n", 0o644).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "third\n");
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn test_write_artifact_reports_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_artifact(&blocker.join("rules.v4"), "x", 0o644).await.unwrap_err();
        match err {
            GatewayError::ArtifactWrite { path, .. } => assert!(path.ends_with("rules.v4")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_render_all_covers_every_artifact() {
        let paths = ConfigPaths::default();
        let artifacts = render_all(&fixtures::proxy("de"), &fixtures::topology(), &paths).unwrap();

        let kinds: Vec<ArtifactKind> = artifacts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ArtifactKind::AddressAssignment,
                ArtifactKind::NameResolution,
                ArtifactKind::RedirectionV4,
                ArtifactKind::RedirectionV6,
                ArtifactKind::AnonymityRouting,
            ]
        );
        assert!(artifacts.iter().all(|a| !a.contents.is_empty()));
        assert_eq!(artifacts[4].path, paths.torrc);
    }
}
