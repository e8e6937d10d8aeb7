use super::*;
use crate::encode::sink::InMemoryEncoder;
use image::{DynamicImage, Rgba, RgbaImage};

/// Draws one opaque pixel whose color encodes the markup, on a transparent canvas.
#[derive(Default)]
struct MockBackend {
    acquired: u32,
    released: u32,
    rendered: Vec<String>,
    fail_on_render: Option<usize>,
}

impl RenderBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn acquire(&mut self, _viewport: Viewport) -> ScorecastResult<()> {
        self.acquired += 1;
        Ok(())
    }

    fn render(&mut self, markup: &str, viewport: Viewport) -> ScorecastResult<DynamicImage> {
        if self.fail_on_render == Some(self.rendered.len()) {
            return Err(ScorecastError::render_backend("mock crash"));
        }
        self.rendered.push(markup.to_owned());
        let sum = markup.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
        let mut img = RgbaImage::from_pixel(viewport.width, viewport.height, Rgba([0, 0, 0, 0]));
        img.put_pixel(3, 2, Rgba([sum, 255 - sum, 7, 255]));
        img.put_pixel(5, 4, Rgba([sum, sum, sum, 255]));
        Ok(DynamicImage::ImageRgba8(img))
    }

    fn release(&mut self) -> ScorecastResult<()> {
        self.released += 1;
        Ok(())
    }
}

struct FailingEncoder;

impl FrameEncoder for FailingEncoder {
    fn encode(&mut self, _job: &EncodeJob) -> ScorecastResult<PathBuf> {
        Err(ScorecastError::encoding("exit status 1: unknown codec"))
    }
}

fn pipeline(csv: &str, template: &str, opts: OverlayOpts) -> OverlayPipeline {
    OverlayPipeline::new(
        Timeline::load(csv.as_bytes()).unwrap(),
        Template::new(template),
        GlobalParams::new(),
        opts,
    )
    .unwrap()
}

fn small_opts(fps: u32) -> OverlayOpts {
    OverlayOpts {
        fps,
        viewport: Viewport::new(16, 8).unwrap(),
        ..OverlayOpts::default()
    }
}

#[test]
fn two_events_at_one_fps_dedupe_first_two_frames() {
    let mut p = pipeline("timestamp,x\n0.0,A\n2.0,B\n", "x={{x}}", small_opts(1));
    assert_eq!(p.total_frames(), 3);

    let mut backend = MockBackend::default();
    let mut encoder = InMemoryEncoder::new();
    let report = p
        .run(&mut backend, &mut encoder, Path::new("overlay.mov"))
        .unwrap();

    assert_eq!(backend.rendered, vec!["x=A".to_owned(), "x=B".to_owned()]);
    assert_eq!(
        report.stats,
        RenderStats {
            frames_total: 3,
            frames_rendered: 2,
            frames_reused: 1,
        }
    );

    let frames = encoder.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], frames[1]);
    assert_ne!(frames[1], frames[2]);
    assert_eq!(report.out_path, PathBuf::from("overlay.mov"));
    assert_eq!(p.state(), PipelineState::Done);
    assert_eq!((backend.acquired, backend.released), (1, 1));
}

#[test]
fn rendered_frames_are_trimmed() {
    let mut p = pipeline("timestamp,x\n0,A\n", "{{x}}", small_opts(2));
    let mut backend = MockBackend::default();
    let mut encoder = InMemoryEncoder::new();
    p.run(&mut backend, &mut encoder, Path::new("o.mov")).unwrap();

    for bytes in encoder.frames() {
        let img = image::load_from_memory(bytes).unwrap();
        assert_eq!((img.width(), img.height()), (3, 3));
    }
}

#[test]
fn repeated_identical_rows_do_not_rerender() {
    let mut p = pipeline(
        "timestamp,x\n0,A\n1,A\n2,B\n3,B\n",
        "{{x}}",
        small_opts(2),
    );
    let mut backend = MockBackend::default();
    let mut encoder = InMemoryEncoder::new();
    let report = p.run(&mut backend, &mut encoder, Path::new("o.mov")).unwrap();
    assert_eq!(report.stats.frames_total, 8);
    assert_eq!(report.stats.frames_rendered, 2);
}

#[test]
fn globals_fill_what_events_leave_open() {
    let timeline = Timeline::load("timestamp,score\n0,1-0\n".as_bytes()).unwrap();
    let globals = GlobalParams::parse_assignments(["title=Final", "score=ignored"]).unwrap();
    let mut p = OverlayPipeline::new(
        timeline,
        Template::new("{{title}}: {{score}}"),
        globals,
        small_opts(1),
    )
    .unwrap();
    let mut backend = MockBackend::default();
    p.run(&mut backend, &mut InMemoryEncoder::new(), Path::new("o.mov"))
        .unwrap();
    assert_eq!(backend.rendered, vec!["Final: 1-0".to_owned()]);
}

#[test]
fn render_failure_releases_backend_and_fails() {
    let mut p = pipeline("timestamp,x\n0,A\n1,B\n", "{{x}}", small_opts(1));
    let mut backend = MockBackend {
        fail_on_render: Some(1),
        ..MockBackend::default()
    };
    let mut encoder = InMemoryEncoder::new();
    let err = p
        .run(&mut backend, &mut encoder, Path::new("o.mov"))
        .unwrap_err();

    assert!(matches!(err, ScorecastError::RenderBackend(_)));
    assert_eq!(p.state(), PipelineState::Failed);
    assert_eq!(backend.released, 1);
    assert!(encoder.job().is_none());
}

#[test]
fn encoding_failure_releases_backend_and_fails() {
    let mut p = pipeline("timestamp,x\n0,A\n", "{{x}}", small_opts(1));
    let mut backend = MockBackend::default();
    let err = p
        .run(&mut backend, &mut FailingEncoder, Path::new("o.mov"))
        .unwrap_err();

    assert!(matches!(err, ScorecastError::Encoding(_)));
    assert_eq!(p.state(), PipelineState::Failed);
    assert_eq!(backend.released, 1);
}

#[test]
fn kept_frames_are_reported() {
    let mut opts = small_opts(1);
    opts.keep_frames = true;
    let mut p = pipeline("timestamp,x\n0,A\n", "{{x}}", opts);
    let report = p
        .run(
            &mut MockBackend::default(),
            &mut InMemoryEncoder::new(),
            Path::new("o.mov"),
        )
        .unwrap();

    let dir = report.frames_dir.expect("frames dir");
    assert!(dir.join("frame_000000.png").is_file());
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn default_duration_is_last_timestamp_plus_one() {
    let p = pipeline("timestamp,x\n0,A\n9.5,B\n", "{{x}}", small_opts(30));
    assert_eq!(p.duration_secs(), 10.5);
    assert_eq!(p.total_frames(), 315);
}

#[test]
fn explicit_duration_overrides_default() {
    let mut opts = small_opts(4);
    opts.duration = Some(2.5);
    let p = pipeline("timestamp,x\n0,A\n9.5,B\n", "{{x}}", opts);
    assert_eq!(p.total_frames(), 10);
}

#[test]
fn invalid_options_are_config_errors() {
    let timeline = || Timeline::load("timestamp,x\n0,A\n".as_bytes()).unwrap();
    let build = |opts: OverlayOpts| {
        OverlayPipeline::new(timeline(), Template::new(""), GlobalParams::new(), opts)
    };

    let zero_fps = build(OverlayOpts {
        fps: 0,
        ..OverlayOpts::default()
    });
    assert!(matches!(zero_fps, Err(ScorecastError::Config(_))));

    let negative = build(OverlayOpts {
        duration: Some(-1.0),
        ..OverlayOpts::default()
    });
    assert!(matches!(negative, Err(ScorecastError::Config(_))));

    let no_frames = build(OverlayOpts {
        fps: 1,
        duration: Some(0.5),
        ..OverlayOpts::default()
    });
    assert!(matches!(no_frames, Err(ScorecastError::Config(_))));
}
