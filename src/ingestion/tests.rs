use super::{IngestionError, LineParser, Loader, ParseError, TextEncoding};

use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

fn default_loader() -> Loader {
    Loader::new(LineParser::default(), vec![TextEncoding::Utf8Bom, TextEncoding::Utf8, TextEncoding::Latin1])
}

fn create_temporary_file(bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_parser_accepts_well_formed_line() -> Result<()> {
    let record = LineParser::default().parse("  T001 | 2024-12-01 | P101 | Laptop | 2 | 45000.00 | C001 | North  ")?;

    assert_eq!(record.transaction_id, "T001");
    assert_eq!(record.date, "2024-12-01");
    assert_eq!(record.product_id, "P101");
    assert_eq!(record.product_name, "Laptop");
    assert_eq!(record.quantity, 2);
    assert_eq!(record.unit_price, Decimal::from_str("45000.00")?);
    assert_eq!(record.customer_id, "C001");
    assert_eq!(record.region, "North");

    Ok(())
}

#[test]
fn test_parser_strips_thousands_separators() -> Result<()> {
    let record = LineParser::default().parse("T002|2024-12-02|P105|Mouse,Wireless|1,200|1,500.50|C002|South")?;

    assert_eq!(record.product_name, "MouseWireless");
    assert_eq!(record.quantity, 1200);
    assert_eq!(record.unit_price, Decimal::from_str("1500.50")?);

    Ok(())
}

#[test]
fn test_parser_honours_custom_separators() -> Result<()> {
    let record = LineParser::new(vec!['_', '\'']).parse("T003|2024-12-03|P106|Desk_Lamp|1'000|2_000.5|C003|East")?;

    assert_eq!(record.product_name, "DeskLamp");
    assert_eq!(record.quantity, 1000);
    assert_eq!(record.unit_price, Decimal::from_str("2000.5")?);

    Ok(())
}

#[test]
fn test_parser_rejects_wrong_field_count() {
    let parser = LineParser::default();

    assert_eq!(parser.parse("bad|line|only|three"), Err(ParseError::FieldCount { expected: 8, found: 4 }));
    assert_eq!(parser.parse("T1|a|b|c|1|2|C1|North|extra"), Err(ParseError::FieldCount { expected: 8, found: 9 }));
}

#[test]
fn test_parser_rejects_non_numeric_quantity_and_price() {
    let parser = LineParser::default();

    assert!(matches!(parser.parse("T1|2024-01-01|P1|Pen|two|5.00|C1|North"), Err(ParseError::InvalidQuantity(_))));
    assert!(matches!(parser.parse("T1|2024-01-01|P1|Pen|2.5|5.00|C1|North"), Err(ParseError::InvalidQuantity(_))));
    assert!(matches!(parser.parse("T1|2024-01-01|P1|Pen|2|five|C1|North"), Err(ParseError::InvalidUnitPrice(_))));
}

#[test]
fn test_parser_defers_semantic_checks() -> Result<()> {
    let record = LineParser::default().parse("X9|2024-01-01|Q1|Pen|0|-5.00|Z1|")?;

    assert_eq!(record.transaction_id, "X9");
    assert_eq!(record.quantity, 0);
    assert_eq!(record.region, "");

    Ok(())
}

#[test]
fn test_loader_counts_parse_attempts_and_failures() -> Result<()> {
    let content = "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n\
                   T1|2024-01-01|P101|Widget|5|10.00|C1|North\n\
                   \n\
                   T2|2024-01-01|P102|Gadget|0|5.00|C2|South\n\
                   bad|line|only|three\n";
    let file = create_temporary_file(content.as_bytes())?;

    let outcome = default_loader().load(file.path())?;

    assert_eq!(outcome.total_parsed, 3);
    assert_eq!(outcome.parse_failures, 1);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].transaction_id, "T1");
    assert_eq!(outcome.records[1].transaction_id, "T2");
    assert_eq!(outcome.encoding, TextEncoding::Utf8);

    Ok(())
}

#[test]
fn test_loader_only_drops_header_in_first_position() {
    let loader = default_loader();
    let text = "\n  \ntransaction_id|x\nT1|2024-01-01|P1|A|1|1|C1|N\nTRANSACTION|x\n";

    let (records, total_parsed, parse_failures) = loader.parse_text(text);

    assert_eq!(records.len(), 1);
    assert_eq!(total_parsed, 2);
    assert_eq!(parse_failures, 1);
}

#[test]
fn test_loader_strips_utf8_byte_order_mark() -> Result<()> {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"TransactionID|Date\nT1|2024-01-01|P1|A|1|1|C1|N\n");
    let file = create_temporary_file(&bytes)?;

    let outcome = default_loader().load(file.path())?;

    assert_eq!(outcome.encoding, TextEncoding::Utf8Bom);
    assert_eq!(outcome.total_parsed, 1);
    assert_eq!(outcome.records.len(), 1);

    Ok(())
}

#[test]
fn test_loader_falls_back_to_latin1() -> Result<()> {
    let file = create_temporary_file(b"T1|2024-01-01|P1|Caf\xe9|1|1|C1|N\n")?;

    let outcome = default_loader().load(file.path())?;

    assert_eq!(outcome.encoding, TextEncoding::Latin1);
    assert_eq!(outcome.records[0].product_name, "Café");

    Ok(())
}

#[test]
fn test_loader_reports_unreadable_when_no_encoding_fits() -> Result<()> {
    let file = create_temporary_file(b"T1|2024-01-01|P1|Caf\xe9|1|1|C1|N\n")?;
    let loader = Loader::new(LineParser::default(), vec![TextEncoding::Utf8]);

    let result = loader.load(file.path());

    assert!(matches!(result, Err(IngestionError::FileNotReadable { .. })));

    Ok(())
}

#[test]
fn test_loader_reports_missing_file() {
    let result = default_loader().load("definitely_missing_sales_file.txt");

    assert!(matches!(result, Err(IngestionError::FileNotFound { .. })));
}
