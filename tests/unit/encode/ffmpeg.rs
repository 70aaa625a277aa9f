use super::*;
use crate::foundation::core::Canvas;

fn args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn cfg(width: u32, height: u32) -> EncoderConfig {
    EncoderConfig {
        width,
        height,
        fps: Fps::CAPTURE,
    }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_straight_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn webm_command_streams_vp9_to_stdout() {
    let enc = FfmpegEncoder::new(FfmpegEncoderOpts::default());
    let a = args(&enc.build_command(&cfg(64, 32)));
    assert!(a.windows(2).any(|w| w == ["-c:v", "libvpx-vp9"]));
    assert!(a.windows(2).any(|w| w == ["-r", "30/1"]));
    assert_eq!(a.last().map(String::as_str), Some("pipe:1"));
    assert!(!a.iter().any(|s| s == "-vf"));
    assert_eq!(enc.mime(), "video/webm");
}

#[test]
fn mp4_command_is_fragmented_and_odd_sizes_are_cropped() {
    let enc = FfmpegEncoder::new(FfmpegEncoderOpts {
        container: VideoContainer::Mp4,
        ..FfmpegEncoderOpts::default()
    });
    let a = args(&enc.build_command(&cfg(63, 32)));
    assert!(a.windows(2).any(|w| w == ["-movflags", "frag_keyframe+empty_moov"]));
    assert!(a.iter().any(|s| s == "-vf"));
    assert_eq!(enc.extension(), "mp4");
}

#[test]
fn missing_program_is_an_encoder_failure() {
    let mut enc = FfmpegEncoder::new(FfmpegEncoderOpts {
        program: "prismwarp-no-such-ffmpeg".to_string(),
        ..FfmpegEncoderOpts::default()
    });
    assert!(matches!(
        enc.begin(cfg(16, 16)),
        Err(PrismError::EncoderFailure(_))
    ));
}

#[test]
fn encodes_a_short_webm_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let mut enc = FfmpegEncoder::new(FfmpegEncoderOpts::default());
    enc.begin(cfg(32, 32)).unwrap();
    let frame = FrameRGBA::transparent(Canvas::new(32, 32).unwrap());
    for i in 0..5 {
        enc.push_frame(FrameIndex(i), &frame).unwrap();
    }
    let out = enc.finish().unwrap();
    assert_eq!(out.frames, 5);
    // EBML magic.
    assert_eq!(&out.bytes[..4], &[0x1a, 0x45, 0xdf, 0xa3]);
}
