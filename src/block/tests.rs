use super::*;

fn raw(text: &str) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .map(|(i, line)| RawLine {
            number: i + 1,
            text: line.trim().to_string(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

fn block_of(text: &str) -> Block {
    let mut block = Block::new(0, 1);
    for line in raw(text) {
        block.push_line(line.number, &line.text);
    }
    block
}

fn header_of(text: &str) -> Header {
    let mut header = Header::new(0, 1);
    for line in raw(text) {
        header.block_mut().push_line(line.number, &line.text);
    }
    header.close();
    header
}

fn scan_of(text: &str) -> Scan {
    let mut scan = Scan::new(0, 1, 0);
    for line in raw(text) {
        scan.block_mut().push_line(line.number, &line.text);
    }
    scan.set_position(0, 1);
    scan
}

const HEADER: &str = "\
#F /data/run1/sample.dat
#E 1389712345
#D Tue Jan 14 15:52:25 2014
#C fourc  User = specuser
#O0 Two Theta  Theta
#o0 tth th
#J0 Seconds  Monitor
";

#[test]
fn test_parse_is_idempotent() {
    let block = block_of("#S 3 ascan th 0 1 2 1\n#N 2\n#L th  det\n0 1\n0.5 x\n1 3");
    let first = block.parse();
    let second = block.parse();
    assert_eq!(first, second);
    assert_eq!(first.errors.len(), 1);
}

#[test]
fn test_scan_line() {
    let fields = block_of("#S 12  ascan  th 0 1 10 1").parse();
    assert_eq!(fields.number, 12);
    assert_eq!(fields.id, Some(12));
    assert_eq!(fields.command, "ascan th 0 1 10 1");
}

#[test]
fn test_wrong_column_count_skips_row() {
    let fields = block_of("#S 1 ascan\n#N 3\n#L a  b  c\n1 2 3\n1 2\n4 5 6").parse();

    assert_eq!(fields.data, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    assert_eq!(fields.errors.len(), 1);

    let error = &fields.errors[0];
    assert_eq!(error.block_id, Some(1));
    assert_eq!(error.message, "erroneous data / wrong number of columns");
    assert_eq!(
        error.line,
        Some(LinePosition {
            relative: 5,
            absolute: 5
        })
    );
    assert_eq!(error.raw_line.as_deref(), Some("1 2"));
}

#[test]
fn test_non_numeric_row() {
    let fields = block_of("#S 1 ascan\n#N 2\n1 two").parse();
    assert!(fields.data.is_empty());
    assert_eq!(fields.errors[0].message, "erroneous data / wrong data line");
}

#[test]
fn test_absolute_line_numbers() {
    let mut block = Block::new(400, 40);
    block.push_line(40, "#S 7 timescan");
    block.push_line(41, "#N 1");
    block.push_line(44, "oops");

    let fields = block.parse();
    assert_eq!(
        fields.errors[0].line,
        Some(LinePosition {
            relative: 3,
            absolute: 44
        })
    );
}

#[test]
fn test_first_columns_and_labels_win() {
    let fields = block_of("#N 2\n#L a  b\n#N 3\n#L c  d  e").parse();
    assert_eq!(fields.columns, Some(2));
    assert_eq!(fields.labels, Some(vec!["a".to_string(), "b".to_string()]));
}

#[test]
fn test_bad_tag_values() {
    let fields = block_of("#S abc\n#N many\n#E soon").parse();
    let messages: Vec<&str> = fields.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "erroneous data / wrong scan number (abc)",
            "erroneous data / wrong value for #N line",
            "erroneous data / wrong value for #E line",
        ]
    );
    assert_eq!(fields.columns, None);
}

#[test]
fn test_unknown_and_empty_tags() {
    let fields = block_of("#X something\n#C\n#N").parse();
    assert_eq!(fields.errors.len(), 1);
    assert_eq!(fields.errors[0].message, "erroneous data / unknown header line (X)");
    assert!(fields.comments.is_empty());
    assert_eq!(fields.columns, None);
}

#[test]
fn test_label_and_mnemonic_splitting() {
    let fields = block_of("#O0 Two Theta  Theta\n#O1 Chi  Phi\n#o0 tth th\n#j0 sec  mon").parse();
    assert_eq!(fields.motor_labels, vec!["Two Theta", "Theta", "Chi", "Phi"]);
    assert_eq!(fields.motor_mnemonics, vec!["tth", "th"]);
    assert_eq!(fields.counter_mnemonics, vec!["sec", "mon"]);
}

#[test]
fn test_motor_positions_split_on_single_space() {
    let fields = block_of("#P0 1  2").parse();
    assert_eq!(fields.motor_positions, vec!["1", "", "2"]);
}

#[test]
fn test_misc_tags() {
    let fields =
        block_of("#T 1  (Seconds)\n#G0 0 0 1\n#G1 2.5 3\n#Q 1 1 0\n#U note\n#@MCA %16C").parse();

    let count_time = fields.count_time.unwrap();
    assert_eq!(count_time.value, "1");
    assert_eq!(count_time.units, "Seconds");
    assert_eq!(fields.geometry.len(), 2);
    assert_eq!(fields.q_value.as_deref(), Some("1 1 0"));
    assert_eq!(fields.user_lines, vec!["note"]);
    assert_eq!(
        fields.extra_lines,
        vec![("MCA".to_string(), "%16C".to_string())]
    );
}

#[test]
fn test_spectrum_with_continuation() {
    let fields = block_of("#S 2 mca\n#N 1\n@A 1 2 3\\\n4 5\n7").parse();

    assert!(fields.errors.is_empty());
    assert_eq!(fields.spectra.len(), 1);
    assert_eq!(fields.spectra[0].samples(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(fields.data, vec![vec![7.0]]);
}

#[test]
fn test_calibrated_spectrum() {
    let fields = block_of("#@CALIB 1 2 0\n@A 5 6").parse();
    let spectrum = &fields.spectra[0];
    assert_eq!(spectrum.energies(), Some(vec![1.0, 3.0]));
}

#[test]
fn test_bad_calibration() {
    let fields = block_of("#@CALIB 1 2\n@A 5 6").parse();
    assert_eq!(fields.errors[0].message, "erroneous data / wrong calibration (1 2)");
    assert!(fields.spectra[0].calibration().is_none());
}

#[test]
fn test_bad_spectrum_is_dropped() {
    let fields = block_of("#N 1\n@A 1 x\\\n3 y\n8").parse();

    assert!(fields.spectra.is_empty());
    assert_eq!(fields.errors.len(), 1);
    assert_eq!(fields.errors[0].message, "erroneous data / wrong spectrum data (x)");
    assert_eq!(fields.data, vec![vec![8.0]]);
}

#[test]
fn test_unterminated_spectrum() {
    let fields = block_of("@A 1 2\\\n3\\").parse();
    assert!(fields.spectra.is_empty());
    assert_eq!(fields.errors.len(), 1);
    assert_eq!(fields.errors[0].message, "unterminated spectrum");
    assert_eq!(fields.errors[0].line, None);
}

#[test]
fn test_header_creator_and_epoch() {
    let header = header_of(HEADER);
    assert_eq!(header.state(), ParseState::Parsed);
    assert_eq!(header.filename(), "/data/run1/sample.dat");
    assert_eq!(header.epoch(), 1389712345);
    assert_eq!(header.date(), "Tue Jan 14 15:52:25 2014");
    assert_eq!(header.spec().as_deref(), Some("fourc"));
    assert_eq!(header.user().as_deref(), Some("specuser"));
    assert_eq!(
        header.epoch_datetime().map(|t| t.timestamp()),
        Some(1389712345)
    );
    assert!(header.errors().is_empty());
}

#[test]
fn test_creator_missing() {
    let comments = vec!["no creator here".to_string()];
    assert_eq!(Creator::from_comments(&comments), None);
}

#[test]
fn test_motor_positions_inherit_header_names() {
    let header = header_of(HEADER);
    let scan = scan_of("#S 1 ascan\n#P0 10 5\n#N 1\n#L det\n3");
    let view = ScanRef::new(&scan, Some(&header));

    assert!(view.errors().is_empty());
    assert_eq!(
        view.motor_positions().unwrap(),
        &[
            ("Two Theta".to_string(), "10".to_string()),
            ("Theta".to_string(), "5".to_string()),
        ]
    );
    assert_eq!(view.motor_position("Theta"), Some("5"));
    assert_eq!(view.motor_mnemonics().unwrap(), &["tth", "th"]);
    assert_eq!(view.counter_names().unwrap(), &["Seconds", "Monitor"]);
    assert_eq!(view.counter_mnemonics(), None);
    assert_eq!(view.user().as_deref(), Some("specuser"));
    assert_eq!(view.source(), "/data/run1/sample.dat");
    assert_eq!(view.file_epoch(), Some(1389712345));
}

#[test]
fn test_scan_names_override_header() {
    let header = header_of(HEADER);
    let scan = scan_of("#S 1 ascan\n#O0 chi\n#P0 90");
    let view = ScanRef::new(&scan, Some(&header));
    assert_eq!(view.motor_position("chi"), Some("90"));
}

#[test]
fn test_motor_count_mismatch() {
    let header = header_of(HEADER);
    let scan = scan_of("#S 1 ascan\n#P0 10");
    let view = ScanRef::new(&scan, Some(&header));

    assert_eq!(view.motor_positions(), None);
    assert_eq!(view.errors().len(), 1);
    assert_eq!(
        view.errors()[0].message,
        "number of motor labels and positions are different"
    );
    assert_eq!(view.errors()[0].block_id, Some(1));
}

#[test]
fn test_no_motor_names() {
    let scan = scan_of("#S 4 ct 1");
    let view = ScanRef::new(&scan, None);
    assert_eq!(view.errors()[0].message, "no motor names");
    assert_eq!(view.source(), "");
    assert_eq!(view.user(), None);
}

#[test]
fn test_scan_display_and_position() {
    let mut scan = scan_of("#S 1 ascan th 0 1 2 1");
    assert_eq!(ScanRef::new(&scan, None).to_string(), "1 ascan th 0 1 2 1");

    scan.set_position(3, 2);
    let view = ScanRef::new(&scan, None);
    assert_eq!(view.to_string(), "1.2 ascan th 0 1 2 1");
    assert_eq!(view.scan_index(), 4);
    assert_eq!(view.number_in_file(), 3);
}

#[test]
fn test_scan_parse_state() {
    let mut scan = scan_of("#S 1 ascan\n#N 1\n1");
    assert_eq!(scan.state(), ParseState::Unparsed);

    assert_eq!(ScanRef::new(&scan, None).lines(), 1);
    assert_eq!(scan.state(), ParseState::Parsed);

    scan.reopen();
    assert_eq!(scan.state(), ParseState::Stale);
    scan.block_mut().push_line(4, "2");

    assert_eq!(ScanRef::new(&scan, None).lines(), 2);
    assert_eq!(scan.state(), ParseState::Parsed);
}

#[test]
fn test_column_by_label() {
    let scan = scan_of("#S 1 ascan\n#N 2\n#L th  det\n0 10\n1 20");
    let view = ScanRef::new(&scan, None);
    assert_eq!(view.column("det"), Some(vec![10.0, 20.0]));
    assert_eq!(view.column("mon"), None);
}

#[test]
fn test_meta_serialization() {
    let header = header_of(HEADER);
    let scan = scan_of("#S 5 ascan\n#D today\n#P0 1 2\n#Q 0 0 1\n#G0 1 2\n#N 1\n#L det\n3");
    let meta = ScanRef::new(&scan, Some(&header)).meta();

    assert_eq!(meta.points, 1);
    assert_eq!(meta.hkl, "0 0 1");

    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(json["scanno"], 5);
    assert_eq!(json["HKL"], "0 0 1");
    assert_eq!(json["geo"][0], "1 2");
    assert_eq!(json["motmnes"][1], "th");
    assert!(json.get("errors").is_none());
    assert!(json.get("cntmnes").is_none());
}
