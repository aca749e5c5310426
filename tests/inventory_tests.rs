use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs;
use std::path::Path;
use stocktake::inventory::{load, list_inventory_files, resolve_inventory, BARCODE_COLUMN};
use stocktake::StocktakeError;
use tempfile::TempDir;

fn create_sample_csv_content() -> &'static str {
    "BARCODE,LOCATION,MODEL,QUANTITY,NOTE
4001,A1,Aviator,2,
4002.0,A2,Wayfarer,1,nan
ABC-1,B1,Clubmaster,,display only"
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_csv_inventory() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stock.csv", create_sample_csv_content());

    let table = load(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.headers()[0], BARCODE_COLUMN);
    assert_eq!(table.cell(1, "BARCODE"), Some("4002.0"));
    assert_eq!(table.cell(2, "NOTE"), Some("display only"));
    // NaN markers and empty cells are both blank strings
    assert_eq!(table.cell(0, "NOTE"), Some(""));
    assert_eq!(table.cell(1, "NOTE"), Some(""));
}

#[test]
fn test_load_uppercase_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "STOCK.CSV", create_sample_csv_content());
    assert_eq!(load(&path).unwrap().len(), 3);
}

#[test]
fn test_load_nonexistent_file() {
    let result = load("/this/file/does/not/exist.csv");
    assert!(matches!(result, Err(StocktakeError::NotFound(_))));
}

#[test]
fn test_load_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stock.txt", create_sample_csv_content());
    assert!(matches!(load(&path), Err(StocktakeError::UnsupportedFormat(_))));
}

#[test]
fn test_load_without_barcode_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stock.csv", "SKU,MODEL\n1,Aviator\n");
    match load(&path) {
        Err(StocktakeError::Schema(column)) => assert_eq!(column, "BARCODE"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_load_does_not_modify_source() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stock.csv", create_sample_csv_content());
    let before = fs::read(&path).unwrap();
    load(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
}

fn write_xlsx(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "BARCODE").unwrap();
    sheet.write_string(0, 1, "MODEL").unwrap();
    sheet.write_string(0, 2, "RRP").unwrap();
    sheet.write_string(0, 3, "FRSTATUS").unwrap();
    sheet.write_string(0, 4, "AVAILFROM").unwrap();
    sheet.write_string(0, 5, "NOTE").unwrap();
    sheet.write_number(1, 0, 4001.0).unwrap();
    sheet.write_string(1, 1, "Aviator").unwrap();
    sheet.write_number(1, 2, 129.5).unwrap();
    sheet.write_boolean(1, 3, true).unwrap();

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
    let datetime = ExcelDateTime::from_ymd(2024, 3, 15)
        .unwrap()
        .and_hms(14, 30, 0)
        .unwrap();
    sheet.write_datetime_with_format(1, 4, &date, &date_format).unwrap();
    sheet.write_string(2, 0, "ABC-1").unwrap();
    sheet.write_datetime_with_format(2, 4, &datetime, &datetime_format).unwrap();
    sheet.write_string(2, 5, " back room ").unwrap();
    workbook.save(path).unwrap();
}

#[test]
fn test_load_xlsx_coerces_cells_to_strings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.xlsx");
    write_xlsx(&path);

    let table = load(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, "BARCODE"), Some("4001"));
    assert_eq!(table.cell(0, "RRP"), Some("129.5"));
    assert_eq!(table.cell(0, "FRSTATUS"), Some("True"));
    assert_eq!(table.cell(1, "BARCODE"), Some("ABC-1"));
    assert_eq!(table.cell(1, "MODEL"), Some(""));
}

#[test]
fn test_load_xlsx_dates_as_strings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.xlsx");
    write_xlsx(&path);

    let table = load(&path).unwrap();
    assert_eq!(table.cell(0, "AVAILFROM"), Some("2024-03-15"));
    assert_eq!(table.cell(1, "AVAILFROM"), Some("2024-03-15 14:30:00"));
}

#[test]
fn test_load_keeps_cell_whitespace() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stock.csv", " BARCODE ,NOTE\n 4001 , top shelf \n");
    let table = load(&path).unwrap();
    assert_eq!(table.cell(0, "NOTE"), Some(" top shelf "));
    assert_eq!(table.cell(0, "BARCODE"), Some(" 4001 "));

    let path = dir.path().join("stock.xlsx");
    write_xlsx(&path);
    let table = load(&path).unwrap();
    assert_eq!(table.cell(1, "NOTE"), Some(" back room "));
}

#[test]
fn test_list_inventory_files() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "b.xlsx", "");
    write_file(&dir, "a.csv", "");
    write_file(&dir, "readme.txt", "");

    assert_eq!(list_inventory_files(dir.path()).unwrap(), vec!["a.csv", "b.xlsx"]);
}

#[test]
fn test_list_inventory_files_missing_folder() {
    let result = list_inventory_files("/this/folder/does/not/exist");
    assert!(matches!(result, Err(StocktakeError::NotFound(_))));
}

#[test]
fn test_resolve_single_candidate() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "only.csv", "");
    assert_eq!(resolve_inventory(dir.path(), None).unwrap(), dir.path().join("only.csv"));
}

#[test]
fn test_resolve_requires_selection_with_several_candidates() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.csv", "");
    write_file(&dir, "b.csv", "");

    assert!(matches!(
        resolve_inventory(dir.path(), None),
        Err(StocktakeError::Config(_))
    ));
    assert_eq!(
        resolve_inventory(dir.path(), Some("b.csv")).unwrap(),
        dir.path().join("b.csv")
    );
}

#[test]
fn test_resolve_empty_folder() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        resolve_inventory(dir.path(), None),
        Err(StocktakeError::NotFound(_))
    ));
}
