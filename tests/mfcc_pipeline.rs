//! End-to-end checks of the public extraction API.

use melcep::analysis::{
    AudioFormat, Dct, FilterBank, FrameLayout, Framer, LogCompression, LookupTable, Mfcc,
    MfccExtractor, RustFftSpectrum, Window, WindowKind, hz_to_mels, mels_to_hz, power_spectrum,
};
use melcep::{MfccConfig, MfccError};

#[test]
fn flat_magnitudes_yield_twelve_coefficients_led_by_the_first() {
    let mfcc = Mfcc::construct(64, 32, 300.0, 3500.0, 8_000).unwrap();
    let coef = mfcc.compute(&[1.0; 64]).unwrap();
    assert_eq!(coef.len(), 12);
    assert!(coef[1..].iter().all(|c| coef[0].abs() > c.abs()));
}

#[test]
fn stages_compose_like_the_pipeline() {
    let amplitudes: Vec<f32> = (0..64).map(|i| ((i * 13) % 11) as f32 * 0.1).collect();
    let bank = FilterBank::construct(64, 26, 300.0, 3500.0, 8_000).unwrap();
    let dct = Dct::new(12, None).unwrap();
    let log_mel: Vec<f32> = bank
        .apply(&power_spectrum(&amplitudes))
        .unwrap()
        .into_iter()
        .map(f32::ln_1p)
        .collect();
    let by_hand = dct.run(&log_mel).unwrap();

    let mfcc = Mfcc::from_parts(bank, Dct::new(12, None).unwrap(), LogCompression::Log1p).unwrap();
    assert_eq!(mfcc.compute(&amplitudes).unwrap(), by_hand);
}

#[test]
fn framer_then_fft_then_pipeline() {
    let sample_rate = 8_000;
    let samples: Vec<f32> = (0..1_000)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin())
        .collect();
    let layout = FrameLayout::new(128, 64).unwrap();
    let window = Window::construct(WindowKind::Hamming, 128, 0.0).unwrap();
    let fft = RustFftSpectrum::new(128).unwrap();
    let mfcc = Mfcc::construct(64, 20, 300.0, 3500.0, sample_rate).unwrap();

    let frames: Vec<_> = Framer::new(&samples, layout)
        .windowed(&window)
        .unwrap()
        .collect();
    assert_eq!(frames.len(), (1_000 - 128) / 64 + 1);
    for frame in &frames {
        use melcep::analysis::SpectrumProvider;
        let amplitudes = fft.amplitudes(&frame.samples).unwrap();
        let coef = mfcc.compute(&amplitudes).unwrap();
        assert_eq!(coef.len(), 12);
    }
}

#[test]
fn extractor_from_config_handles_ulaw_bytes() {
    let config = MfccConfig::from_toml_str("frame_size = 128\nframe_step = 64\n").unwrap();
    let extractor =
        MfccExtractor::new(&config, RustFftSpectrum::new(config.frame_size).unwrap()).unwrap();
    let mut pcm = [0_i16; 256];
    for (i, slot) in pcm.iter_mut().enumerate() {
        *slot = ((i as i32 - 128) * 256) as i16;
    }
    let table = LookupTable::from_pcm16(&pcm);
    let bytes: Vec<u8> = (0..1_024).map(|i| ((i * 7) % 256) as u8).collect();
    let out = extractor
        .extract_ulaw(&AudioFormat::mono(8_000, 8), &bytes, &table)
        .unwrap();
    assert_eq!(out.len(), (1_024 - 128) / 64 + 1);
    assert!(out.iter().all(|f| f.coefficients.len() == 12));
}

#[test]
fn multichannel_audio_is_rejected() {
    let config = MfccConfig::default();
    let extractor =
        MfccExtractor::new(&config, RustFftSpectrum::new(config.frame_size).unwrap()).unwrap();
    let stereo = AudioFormat {
        channels: 2,
        sample_rate: 8_000,
        bits_per_sample: 16,
    };
    let err = extractor.extract(&stereo, &[0_i16; 256]).unwrap_err();
    assert!(matches!(err, MfccError::UnsupportedFormat(_)));
}

#[test]
fn mel_scale_round_trips_across_audible_range() {
    let mut hz = 1.0_f64;
    while hz < 20_000.0 {
        assert!((mels_to_hz(hz_to_mels(hz)) - hz).abs() < 1e-6);
        hz *= 1.7;
    }
}
