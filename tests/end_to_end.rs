use std::fs;

use chrono::NaiveDate;
use tbb_reply::{
    build_report, collect_letters, extract, resolve, write_report_csv, BatchCoordinator,
    BatchSummary, CustomerRegistry, CustomerStatus, FileDecoder, Letter, ResponseComposer,
};

const TAX_OFFICE_LETTER: &str = "T.C.\n\
    GELİR İDARESİ\n\
    VERGİ DAİRESİ MÜDÜRLÜĞÜ\n\
    \n\
    Sayı: E-2024-1234567-890123\n\
    Tarih: 12.03.2024\n\
    Konu: Hesap bilgisi talebi\n\
    \n\
    T.C. Kimlik No: 12345678901.\n\
    Yukarıda kimlik numarası belirtilen kişiye ait hesap bilgilerinin bildirilmesi rica olunur.\n";

#[test]
fn test_tax_office_letter_without_registry() {
    let text = TAX_OFFICE_LETTER.replacen("GELİR İDARESİ\n", "Gelir\n", 1);
    let fields = extract(&text);

    assert_eq!(fields.issuing_authority, "VERGİ DAİRESİ MÜDÜRLÜĞÜ");
    assert_eq!(fields.letter_date, "12.03.2024");
    assert_eq!(fields.reference_number, "E-2024-1234567-890123");
    assert_eq!(fields.national_id, "12345678901");
    assert_eq!(fields.tax_id, "");
    assert_eq!(fields.person_name, "");

    let case = resolve("yazi.txt", fields, None);
    assert_eq!(case.status, CustomerStatus::Unknown);

    let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let doc = ResponseComposer::default().compose_on(&case, today);
    let plain = doc.to_plain_text();

    assert!(plain.contains(
        "gerekli araştırma yapılmış olup, 12345678901 T.C. Kimlik Numaralı ile ilgili gerekli işlemler yapılmaktadır."
    ));
    assert!(plain.contains("İlgi: 12.03.2024 tarihli ve E-2024-1234567-890123 sayılı yazınız."));
}

#[test]
fn test_multiple_authorities_map_to_sub_units() {
    let fields = extract(TAX_OFFICE_LETTER);

    // "İDARESİ" only matches once Turkish lower-casing is applied
    assert_eq!(fields.issuing_authority, "GELİR İDARESİ");
    assert_eq!(fields.issuing_sub_unit1, "VERGİ DAİRESİ MÜDÜRLÜĞÜ");
    assert_eq!(fields.issuing_sub_unit2, "");
}

#[test]
fn test_folder_batch_with_registry() {
    let dir = tempfile::tempdir().unwrap();
    let letters_dir = dir.path().join("yazilar");
    fs::create_dir(&letters_dir).unwrap();

    fs::write(letters_dir.join("01_bilinen.txt"), TAX_OFFICE_LETTER).unwrap();
    fs::write(
        letters_dir.join("02_yabanci.txt"),
        "Ankara Cumhuriyet Başsavcılığı\n01/02/2024\nAli Veli isimli şahıs, T.C. 10987654321\n",
    )
    .unwrap();
    fs::write(letters_dir.join("03_bozuk.pdf"), "%PDF-1.4").unwrap();
    fs::write(letters_dir.join("notlar.xlsx"), "x").unwrap();

    let registry_path = dir.path().join("musteri_listesi.csv");
    fs::write(&registry_path, "TC Kimlik No,Müşteri Adı\n12345678901,Ahmet Yılmaz\n").unwrap();
    let registry = CustomerRegistry::from_csv_path(&registry_path).unwrap();

    let decoder = FileDecoder::new();
    let paths = collect_letters(&letters_dir).unwrap();
    assert_eq!(paths.len(), 3);

    let coordinator = BatchCoordinator::default();
    let records = coordinator.run(
        paths.iter().map(|p| Letter::from_path(p, &decoder)),
        Some(&registry),
    );

    assert_eq!(records[0].status, CustomerStatus::Customer);
    assert_eq!(records[0].fields.person_name, "Ahmet Yılmaz");
    assert_eq!(records[1].status, CustomerStatus::NotCustomer);
    assert_eq!(records[1].fields.letter_date, "01.02.2024");
    assert!(records[2].is_failed());

    let summary = BatchSummary::from_records(&records);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed_count, 1);

    let report_path = dir.path().join("rapor.csv");
    write_report_csv(&report_path, &build_report(&records)).unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    assert_eq!(report.lines().count(), 4);
    assert!(report.contains("03_bozuk.pdf,,,,,,,Hata,Manuel işlem gerekli"));

    let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let replies = coordinator.compose_replies_on(&records, today);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].document.to_plain_text().contains("10987654321 T.C. Kimlik Numaralı"));
}
