pub mod api;
pub mod worker;

#[derive(Debug, Clone)]
pub enum AnalysisData {
    MemMapped(std::sync::Arc<memmap2::Mmap>),
    Preloaded(axum::body::Bytes),
}

impl AnalysisData {
    /// Maps the file at `path` into memory.
    pub fn load<P>(path: P) -> Result<Self, std::io::Error>
    where
        P: AsRef<std::path::Path>,
    {
        let file = std::fs::File::open(path.as_ref())?;
        // SAFETY: the mapping is only ever read.
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };

        Ok(Self::MemMapped(std::sync::Arc::new(mmap)))
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Self::MemMapped(v) => &v[..],
            Self::Preloaded(v) => &v[..],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub data: AnalysisData,
    pub options: analysis::ParseOptions,
}

/// Parses one uploaded or loaded replay and hands the payload to `on_complete`.
///
/// Native CS2 demos are recognised by their magic bytes, anything else is
/// read as an event trace.
#[tracing::instrument(name = "Analysis", skip(input, on_complete))]
pub fn analyse<F>(input: AnalysisInput, on_complete: F)
where
    F: FnOnce(String),
{
    let data = input.data.data();
    tracing::info!(bytes = data.len(), "Starting analysis");

    if data.starts_with(analysis::source::DEMO_MAGIC) {
        return analyse_native(data, &input.options, on_complete);
    }

    let replay = analysis::trace::TraceReplay::new(data);
    analysis::parse_demo(replay, &input.options, on_complete);
}

#[cfg(feature = "csdemo")]
fn analyse_native<F>(data: &[u8], options: &analysis::ParseOptions, on_complete: F)
where
    F: FnOnce(String),
{
    let replay = analysis::csdemo_source::CsDemoReplay::new(data);
    analysis::parse_demo(replay, options, on_complete);
}

#[cfg(not(feature = "csdemo"))]
fn analyse_native<F>(_data: &[u8], _options: &analysis::ParseOptions, on_complete: F)
where
    F: FnOnce(String),
{
    tracing::error!("Received a native demo without csdemo support");
    on_complete(analysis::error_payload(
        "native demos are not supported by this build",
    ));
}

/// The contents of an upload form.
#[derive(Debug, Default)]
pub struct Upload {
    pub demo: Option<axum::body::Bytes>,
    pub options: Option<axum::body::Bytes>,
}

pub async fn get_demo_from_upload(
    demo_name: &str,
    options_name: &str,
    mut form: axum::extract::Multipart,
) -> Upload {
    let mut upload = Upload::default();

    while let Ok(Some(field)) = form.next_field().await {
        let target = match field.name() {
            Some(n) if n == demo_name => &mut upload.demo,
            Some(n) if n == options_name => &mut upload.options,
            _ => continue,
        };

        match field.bytes().await {
            Ok(data) => *target = Some(data),
            Err(e) => {
                tracing::error!("Reading upload field: {:?}", e);
                break;
            }
        }
    }

    upload
}
