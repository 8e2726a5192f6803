//! Source resolution: turning a URL into a title and a downloadable stream.
//!
//! [`MediaSourceResolver`] is the capability the pipeline depends on;
//! [`YtDlpResolver`] implements it with the `yt-dlp` executable. Provider
//! protocols change often, so every failure is reported as an opaque
//! [`AcquisitionFailure`] and never retried.

use crate::error::AcquisitionFailure;

use serde::Deserialize;
use serde_json::Value;

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;

/// Title used when the provider reports none.
pub const FALLBACK_TITLE: &str = "video";

/// One stream offered by the provider (a yt-dlp "format").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Total bitrate in kbps
    #[serde(default)]
    pub tbr: Option<f64>,
}

impl StreamFormat {
    /// True when the stream carries both audio and video in an mp4 container.
    ///
    /// A missing codec field means "unknown" and is accepted; only an explicit
    /// `"none"` rules the stream out.
    pub fn is_progressive_mp4(&self) -> bool {
        let has = |codec: &Option<String>| codec.as_deref() != Some("none");
        self.ext.as_deref() == Some("mp4") && has(&self.vcodec) && has(&self.acodec)
    }
}

/// Subset of the provider metadata the resolver relies on.
#[derive(Debug, Clone, Deserialize)]
struct ProviderMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    formats: Vec<StreamFormat>,
}

/// A URL resolved to a title and a concrete stream.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub title: String,
    pub stream: StreamFormat,
    /// Raw provider metadata, persisted beside the video on request.
    pub metadata: Value,
}

/// Capability to resolve a URL and persist its selected stream.
pub trait MediaSourceResolver: Send + Sync {
    /// Obtains the title and selects the best progressive stream.
    fn resolve(&self, url: &str) -> Result<ResolvedSource, AcquisitionFailure>;

    /// Writes `stream` of `url` to exactly `destination`.
    fn save(
        &self,
        url: &str,
        stream: &StreamFormat,
        destination: &Path,
    ) -> Result<(), AcquisitionFailure>;
}

impl<T: MediaSourceResolver + ?Sized> MediaSourceResolver for &T {
    fn resolve(&self, url: &str) -> Result<ResolvedSource, AcquisitionFailure> {
        (**self).resolve(url)
    }

    fn save(
        &self,
        url: &str,
        stream: &StreamFormat,
        destination: &Path,
    ) -> Result<(), AcquisitionFailure> {
        (**self).save(url, stream, destination)
    }
}

/// Picks the highest-quality progressive mp4 stream: greatest height, ties
/// broken by total bitrate.
pub fn select_progressive_stream(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    formats
        .iter()
        .filter(|f| f.is_progressive_mp4())
        .max_by(|a, b| {
            a.height
                .unwrap_or(0)
                .cmp(&b.height.unwrap_or(0))
                .then(a.tbr.unwrap_or(0.0).total_cmp(&b.tbr.unwrap_or(0.0)))
        })
}

/// Parses `yt-dlp --dump-single-json` output into a [`ResolvedSource`].
pub fn parse_provider_metadata(json: &str) -> Result<ResolvedSource, AcquisitionFailure> {
    let raw: Value = serde_json::from_str(json)?;
    let parsed: ProviderMetadata = serde_json::from_value(raw.clone())?;

    // Some extractors expose a single stream at the top level only.
    let candidates = if parsed.formats.is_empty() {
        serde_json::from_value::<StreamFormat>(raw.clone())
            .map(|f| vec![f])
            .unwrap_or_default()
    } else {
        parsed.formats
    };

    let stream = select_progressive_stream(&candidates)
        .cloned()
        .ok_or(AcquisitionFailure::NoCompatibleStream)?;

    let title = parsed
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    Ok(ResolvedSource {
        title,
        stream,
        metadata: raw,
    })
}

/// Maps yt-dlp's stderr to the failure category it describes.
pub fn classify_failure(stderr: &str, destination: Option<&Path>) -> AcquisitionFailure {
    let lower = stderr.to_lowercase();
    let summary = last_error_line(stderr);

    const NETWORK_MARKERS: [&str; 9] = [
        "http error",
        "timed out",
        "connection refused",
        "connection reset",
        "network is unreachable",
        "name or service not known",
        "getaddrinfo failed",
        "temporary failure in name resolution",
        "unable to download webpage",
    ];
    const WRITE_MARKERS: [(&str, io::ErrorKind); 3] = [
        ("permission denied", io::ErrorKind::PermissionDenied),
        ("no space left on device", io::ErrorKind::Other),
        ("read-only file system", io::ErrorKind::Other),
    ];

    if let Some(path) = destination {
        if let Some((_, kind)) = WRITE_MARKERS.iter().find(|(m, _)| lower.contains(m)) {
            return AcquisitionFailure::LocalWrite {
                path: path.to_path_buf(),
                source: io::Error::new(*kind, summary),
            };
        }
    }
    if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        AcquisitionFailure::Network(summary)
    } else {
        AcquisitionFailure::Resolution(summary)
    }
}

fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("no diagnostic output captured")
        .to_string()
}

/// yt-dlp treats `%` in `-o` as a template marker.
fn escape_output_template(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}

/// [`MediaSourceResolver`] backed by the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    ytdlp_path: PathBuf,
    socket_timeout: Duration,
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_YTDLP_PATH,
            Duration::from_secs(crate::config::DEFAULT_SOCKET_TIMEOUT_SECS),
        )
    }
}

impl YtDlpResolver {
    pub fn new(ytdlp_path: impl Into<PathBuf>, socket_timeout: Duration) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            socket_timeout,
        }
    }

    fn base_args(&self) -> Vec<String> {
        vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.socket_timeout.as_secs().max(1).to_string(),
        ]
    }

    /// Arguments for the metadata lookup. The URL always follows `--` so it
    /// is never parsed as an option.
    pub fn resolve_args(&self, url: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(["--dump-single-json", "-f", "mp4", "--", url].map(String::from));
        args
    }

    /// Arguments for downloading `stream` to exactly `destination`.
    pub fn save_args(&self, url: &str, stream: &StreamFormat, destination: &Path) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(["--no-part", "--force-overwrites", "-f"].map(String::from));
        args.push(stream.format_id.clone());
        args.push("-o".to_string());
        args.push(escape_output_template(destination));
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.ytdlp_path);
        cmd.args(args).stdin(Stdio::null());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Output, AcquisitionFailure> {
        log::debug!("Running resolver command: {:?}", cmd);
        cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AcquisitionFailure::ToolNotFound(self.ytdlp_path.to_string_lossy().into_owned())
            } else {
                AcquisitionFailure::Resolution(format!(
                    "failed to start {}: {}",
                    self.ytdlp_path.display(),
                    e
                ))
            }
        })
    }
}

impl MediaSourceResolver for YtDlpResolver {
    fn resolve(&self, url: &str) -> Result<ResolvedSource, AcquisitionFailure> {
        let cmd = self.command(&self.resolve_args(url));
        let output = self.run(cmd)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("yt-dlp metadata lookup failed ({}): {}", output.status, stderr.trim());
            return Err(classify_failure(&stderr, None));
        }

        let resolved = parse_provider_metadata(&String::from_utf8_lossy(&output.stdout))?;
        log::info!(
            "Resolved '{}' (format {}, {}p)",
            resolved.title,
            resolved.stream.format_id,
            resolved.stream.height.unwrap_or(0)
        );
        Ok(resolved)
    }

    fn save(
        &self,
        url: &str,
        stream: &StreamFormat,
        destination: &Path,
    ) -> Result<(), AcquisitionFailure> {
        let mut cmd = self.command(&self.save_args(url, stream, destination));
        cmd.stdout(Stdio::null());

        let output = self.run(cmd)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("yt-dlp download failed ({}): {}", output.status, stderr.trim());
            return Err(classify_failure(&stderr, Some(destination)));
        }

        if !destination.is_file() {
            return Err(AcquisitionFailure::LocalWrite {
                path: destination.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "downloader reported success but wrote no file",
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str, ext: &str, vcodec: &str, acodec: &str, height: u32, tbr: f64) -> StreamFormat {
        StreamFormat {
            format_id: id.to_string(),
            ext: Some(ext.to_string()),
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            width: None,
            height: Some(height),
            tbr: Some(tbr),
        }
    }

    #[test]
    fn test_select_prefers_highest_progressive_stream() {
        let formats = vec![
            format("18", "mp4", "avc1", "mp4a", 360, 500.0),
            format("22", "mp4", "avc1", "mp4a", 720, 1500.0),
            format("137", "mp4", "avc1", "none", 1080, 4000.0),
            format("251", "webm", "none", "opus", 0, 160.0),
            format("43", "webm", "vp8", "vorbis", 1080, 3000.0),
        ];
        let selected = select_progressive_stream(&formats).unwrap();
        assert_eq!(selected.format_id, "22");
    }

    #[test]
    fn test_select_breaks_height_ties_by_bitrate() {
        let formats = vec![
            format("a", "mp4", "avc1", "mp4a", 720, 900.0),
            format("b", "mp4", "avc1", "mp4a", 720, 1200.0),
        ];
        assert_eq!(select_progressive_stream(&formats).unwrap().format_id, "b");
    }

    #[test]
    fn test_select_none_when_no_progressive_stream() {
        let formats = vec![format("137", "mp4", "avc1", "none", 1080, 4000.0)];
        assert!(select_progressive_stream(&formats).is_none());
        assert!(select_progressive_stream(&[]).is_none());
    }

    #[test]
    fn test_parse_provider_metadata() {
        let json = r#"{
            "id": "abc",
            "title": "My Clip: Test!",
            "formats": [
                {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "tbr": 500.5},
                {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2"}
            ]
        }"#;
        let resolved = parse_provider_metadata(json).unwrap();
        assert_eq!(resolved.title, "My Clip: Test!");
        assert_eq!(resolved.stream.format_id, "18");
        assert_eq!(resolved.metadata["id"], "abc");
    }

    #[test]
    fn test_parse_single_top_level_stream_and_missing_title() {
        let json = r#"{"format_id": "0", "ext": "mp4", "height": 480}"#;
        let resolved = parse_provider_metadata(json).unwrap();
        assert_eq!(resolved.title, FALLBACK_TITLE);
        assert_eq!(resolved.stream.format_id, "0");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_provider_metadata("not json"),
            Err(AcquisitionFailure::Metadata(_))
        ));
        assert!(matches!(
            parse_provider_metadata(r#"{"title": "x", "formats": []}"#),
            Err(AcquisitionFailure::NoCompatibleStream)
        ));
    }

    #[test]
    fn test_classify_failure() {
        let network = "ERROR: [youtube] abc: Unable to download webpage: <urlopen error [Errno 111] Connection refused>";
        assert!(matches!(classify_failure(network, None), AcquisitionFailure::Network(_)));

        let http = "ERROR: unable to download video data: HTTP Error 403: Forbidden";
        assert!(matches!(classify_failure(http, None), AcquisitionFailure::Network(_)));

        let private = "WARNING: something\nERROR: [youtube] abc: Private video. Sign in if you've been granted access";
        match classify_failure(private, None) {
            AcquisitionFailure::Resolution(msg) => assert!(msg.contains("Private video")),
            other => panic!("unexpected classification: {other:?}"),
        }

        let denied = "ERROR: unable to open for writing: [Errno 13] Permission denied: '/ro/video.mp4'";
        assert!(matches!(
            classify_failure(denied, Some(Path::new("/ro/video.mp4"))),
            AcquisitionFailure::LocalWrite { .. }
        ));
    }

    #[test]
    fn test_escape_output_template() {
        assert_eq!(
            escape_output_template(Path::new("/tmp/100% real/video.mp4")),
            "/tmp/100%% real/video.mp4"
        );
    }

    #[test]
    fn test_url_is_passed_after_end_of_options_marker() {
        let resolver = YtDlpResolver::new("yt-dlp", Duration::from_secs(30));
        let url = "--exec=touch /tmp/pwned";

        let args = resolver.resolve_args(url);
        assert_eq!(args.last().map(String::as_str), Some(url));
        assert_eq!(args[args.len() - 2], "--");
        assert!(args.contains(&"--dump-single-json".to_string()));

        let stream = format("22", "mp4", "avc1", "mp4a", 720, 1500.0);
        let args = resolver.save_args(url, &stream, Path::new("/out/100%/video.mp4"));
        assert_eq!(args.last().map(String::as_str), Some(url));
        assert_eq!(args[args.len() - 2], "--");
        let o = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o + 1], "/out/100%%/video.mp4");
        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "22");
        assert_eq!(&args[..4], ["--no-playlist", "--no-warnings", "--socket-timeout", "30"]);
    }

    #[test]
    fn test_missing_ytdlp_is_tool_not_found() {
        let resolver = YtDlpResolver::new("/definitely/not/here/yt-dlp", Duration::from_secs(5));
        let err = resolver.resolve("https://example.com/watch?v=abc").unwrap_err();
        assert!(matches!(err, AcquisitionFailure::ToolNotFound(_)));
    }
}
