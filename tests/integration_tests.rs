use edfdecoder::doctest_utils::{EdfBuilder, SignalSpec};
use edfdecoder::{EdfDocument, EdfError, EdfReader, FileType};

// 创建测试信号的辅助函数
fn create_test_eeg_signal(label: &str, samples_per_record: usize) -> SignalSpec {
    SignalSpec::new(label, samples_per_record).physical(-200.0, 200.0, "uV")
}

fn create_test_ecg_signal(samples_per_record: usize) -> SignalSpec {
    SignalSpec::new("ECG Lead II", samples_per_record)
        .physical(-5.0, 5.0, "mV")
        .digital(-2048, 2047)
}

/// 两通道（2和3个样本/记录）、两个记录，样本值为0..10
fn interleaved_buffer() -> Vec<u8> {
    EdfBuilder::new()
        .signal(create_test_eeg_signal("A", 2))
        .signal(create_test_eeg_signal("B", 3))
        .record(vec![vec![0, 1], vec![2, 3, 4]])
        .record(vec![vec![5, 6], vec![7, 8, 9]])
        .build()
}

#[test]
fn test_header_fields_round_trip() {
    let bytes = EdfBuilder::new()
        .patient_id("MCH-0234567 F 02-MAY-1951 Haagse_Harry")
        .recording_id("Startdate 02-MAR-2002 EMG561 BK/JOP Sony. MNC R Median Nerve.")
        .start("02.03.02", "14.27.00")
        .reserved("EDF+C")
        .record_duration(0.5)
        .signal(create_test_eeg_signal("EEG Fp1", 128))
        .record(vec![vec![0; 128]])
        .record(vec![vec![0; 128]])
        .record(vec![vec![0; 128]])
        .build();

    let doc = EdfDocument::from_bytes(&bytes).unwrap();

    assert_eq!(doc.version, "0");
    assert_eq!(doc.patient_id, "MCH-0234567 F 02-MAY-1951 Haagse_Harry");
    assert_eq!(doc.recording_id, "Startdate 02-MAR-2002 EMG561 BK/JOP Sony. MNC R Median Nerve.");
    assert_eq!(doc.start_date, "02.03.02");
    assert_eq!(doc.start_time, "14.27.00");
    assert_eq!(doc.num_header_bytes, 512);
    assert_eq!(doc.reserved.trim(), "EDF+C");
    assert_eq!(doc.num_records, 3);
    assert_eq!(doc.record_duration, 0.5);
    assert_eq!(doc.num_channels, 1);
    assert_eq!(doc.start_timestamp.unwrap().to_string(), "2002-03-02 14:27:00");
    assert!(doc.diagnostics().is_empty());
}

#[test]
fn test_columnar_channel_decode() {
    let bytes = EdfBuilder::new()
        .signal(create_test_eeg_signal("EEG C3", 256))
        .signal(create_test_ecg_signal(128))
        .record(vec![vec![0; 256], vec![0; 128]])
        .build();

    let doc = EdfDocument::from_bytes(&bytes).unwrap();
    assert_eq!(doc.num_channels, doc.channels().len());

    let eeg = &doc.channels()[0];
    assert_eq!(eeg.label, "EEG C3");
    assert_eq!(eeg.physical_dimension, "uV");
    assert_eq!(eeg.physical_min, -200.0);
    assert_eq!(eeg.physical_max, 200.0);
    assert_eq!(eeg.digital_min, -32768.0);
    assert_eq!(eeg.digital_max, 32767.0);
    assert_eq!(eeg.num_samples_per_record, 256);
    assert_eq!(eeg.transducer, "AgAgCl electrodes");
    assert_eq!(eeg.prefiltering, "HP:0.1Hz LP:70Hz");

    let ecg = &doc.channels()[1];
    assert_eq!(ecg.label, "ECG Lead II");
    assert_eq!(ecg.physical_dimension, "mV");
    assert_eq!(ecg.physical_min, -5.0);
    assert_eq!(ecg.physical_max, 5.0);
    assert_eq!(ecg.digital_min, -2048.0);
    assert_eq!(ecg.digital_max, 2047.0);
    assert_eq!(ecg.num_samples_per_record, 128);
}

#[test]
fn test_blob_interleaving() {
    let doc = EdfDocument::from_bytes(&interleaved_buffer()).unwrap();

    let a = doc.channel("A").unwrap();
    let b = doc.channel("B").unwrap();

    assert_eq!(a.record(0), Some(&[0, 1][..]));
    assert_eq!(a.record(1), Some(&[5, 6][..]));
    assert_eq!(b.record(0), Some(&[2, 3, 4][..]));
    assert_eq!(b.record(1), Some(&[7, 8, 9][..]));

    // 每个通道总样本数 = 每记录样本数 * 记录数
    assert_eq!(a.num_samples(), 4);
    assert_eq!(b.num_samples(), 6);
    assert_eq!(doc.duration(), Some(2.0));
}

#[test]
fn test_different_sampling_rates() {
    let bytes = EdfBuilder::new()
        .record_duration(2.0)
        .signal(create_test_eeg_signal("EEG High", 1024))
        .signal(create_test_ecg_signal(500))
        .signal(create_test_eeg_signal("Resp", 50))
        .record(vec![vec![1; 1024], vec![2; 500], vec![3; 50]])
        .record(vec![vec![1; 1024], vec![2; 500], vec![3; 50]])
        .build();

    let doc = EdfDocument::from_bytes(&bytes).unwrap();

    assert_eq!(doc.sampling_rate("EEG High"), Some(512.0));
    assert_eq!(doc.sampling_rate("ECG Lead II"), Some(250.0));
    assert_eq!(doc.sampling_rate("Resp"), Some(25.0));
    assert_eq!(doc.sampling_rate("Missing"), None);
    assert_eq!(doc.sampling_rates().len(), 3);
    assert_eq!(doc.duration(), Some(4.0));
}

#[test]
fn test_type_derivation() {
    let with_reserved = |reserved: &str| {
        let bytes = EdfBuilder::new()
            .reserved(reserved)
            .signal(create_test_eeg_signal("EEG", 1))
            .record(vec![vec![0]])
            .build();
        EdfDocument::from_bytes(&bytes).unwrap().file_type()
    };

    assert_eq!(with_reserved("EDF+C  "), FileType::EdfPlusC);
    assert_eq!(with_reserved("EDF+D"), FileType::EdfPlusD);
    assert_eq!(with_reserved(""), FileType::Edf);
    assert_eq!(with_reserved("   "), FileType::Edf);
    assert_eq!(FileType::EdfPlusC.to_string(), "EDF+C");
    assert_eq!(FileType::Edf.as_str(), "EDF");
}

#[test]
fn test_zero_channel_short_circuit() {
    let mut bytes = EdfBuilder::new().reserved("EDF+C").build();
    assert_eq!(bytes.len(), 256);
    // 头部之后的多余字节不会被当作样本处理
    bytes.extend_from_slice(&[0x55; 64]);

    let doc = EdfReader::new().header_only(false).decode(&bytes).unwrap();

    assert_eq!(doc.num_channels, 0);
    assert!(doc.channels().is_empty());
    assert!(doc.labels().is_empty());
    assert_eq!(doc.duration(), None);
    assert!(doc.sampling_rates().is_empty());
    assert!(doc.diagnostics().is_empty());
}

#[test]
fn test_header_only_decode() {
    let doc = EdfReader::new().header_only(true).decode(&interleaved_buffer()).unwrap();

    assert_eq!(doc.labels(), vec!["A", "B"]);
    assert_eq!(doc.channel("B").unwrap().num_samples_per_record, 3);
    assert_eq!(doc.channel("B").unwrap().num_samples(), 0);
    assert_eq!(doc.duration(), None);
    assert_eq!(doc.sampling_rate("A"), None);

    // 通道采样率只依赖头部
    assert_eq!(doc.channel("A").unwrap().sampling_rate(), 2.0);
    assert_eq!(doc.channel("B").unwrap().sampling_rate(), 3.0);
    assert_eq!(doc.channel("B").unwrap().num_records(), 2);
}

#[test]
fn test_header_only_sampling_rate_uses_record_duration() {
    let bytes = EdfBuilder::new()
        .record_duration(2.0)
        .signal(SignalSpec::new("EEG", 256))
        .record(vec![vec![0; 256]])
        .build();
    let doc = EdfReader::new().header_only(true).decode(&bytes).unwrap();

    assert_eq!(doc.channel("EEG").unwrap().sampling_rate(), 128.0);
}

#[test]
fn test_idempotent_redecode() {
    let bytes = edfdecoder::doctest_utils::simple_test_buffer();

    let first = EdfDocument::from_bytes(&bytes).unwrap();
    let second = EdfDocument::from_bytes(&bytes).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.labels(), second.labels());
    for (a, b) in first.channels().iter().zip(second.channels()) {
        assert_eq!(a.records(), b.records());
    }
}

#[tokio::test]
async fn test_physical_samples_defaults() {
    let doc = EdfDocument::from_bytes(&interleaved_buffer()).unwrap();

    let all = doc.get_physical_samples(None, None, None, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["A"].len(), 4);
    assert_eq!(all["B"].len(), 6);

    let a = doc.channel("A").unwrap();
    let expected: Vec<f64> = [0, 1, 5, 6].iter().map(|&d| a.to_physical(d)).collect();
    assert_eq!(all["A"], expected);
}

#[tokio::test]
async fn test_physical_samples_window() {
    let doc = EdfDocument::from_bytes(&interleaved_buffer()).unwrap();

    // 从第1秒开始读取B通道
    let window = doc
        .get_physical_samples(Some(1.0), Some(1.0), Some(&["B"][..]), None)
        .await
        .unwrap();
    assert_eq!(window.len(), 1);

    let b = doc.channel("B").unwrap();
    let expected: Vec<f64> = [7, 8, 9].iter().map(|&d| b.to_physical(d)).collect();
    assert_eq!(window["B"], expected);

    // n优先于dt
    let counted = doc
        .get_physical_samples(Some(0.0), Some(2.0), Some(&["A", "B"][..]), Some(1))
        .await
        .unwrap();
    assert_eq!(counted["A"].len(), 1);
    assert_eq!(counted["B"].len(), 1);
}

#[tokio::test]
async fn test_physical_samples_unknown_channel() {
    let doc = EdfDocument::from_bytes(&interleaved_buffer()).unwrap();

    let result = doc.get_physical_samples(None, None, Some(&["A", "EMG"][..]), None).await;
    match result {
        Err(EdfError::UnknownChannel(label)) => assert_eq!(label, "EMG"),
        other => panic!("expected UnknownChannel, got {:?}", other),
    }
}

#[tokio::test]
async fn test_physical_value_range() {
    let bytes = EdfBuilder::new()
        .signal(create_test_ecg_signal(4))
        .record(vec![vec![-2048, 0, 1024, 2047]])
        .build();
    let doc = EdfDocument::from_bytes(&bytes).unwrap();

    let samples = doc.get_physical_samples(None, None, None, None).await.unwrap();
    let ecg = &samples["ECG Lead II"];

    assert!((ecg[0] + 5.0).abs() < 1e-9);
    assert!((ecg[3] - 5.0).abs() < 1e-9);
    assert!(ecg.iter().all(|v| v.abs() <= 5.0 + 1e-9));
}
