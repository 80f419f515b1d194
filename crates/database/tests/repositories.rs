//! Repository behaviour against a migrated SQLite database.

use chrono::{NaiveDate, TimeZone, Utc};
use rijschool_config::DatabaseConfig;
use rijschool_database::{
    initialize_database, BookingError, BookingRepository, BookingRequest, CreateInstructorRequest,
    CreateNewsletterRequest, CreatePaymentRequest, CreateStudentRequest, DatabaseError,
    DocumentRepository, DocumentSubmission, InstructorRepository, NewsletterRepository,
    PaymentRepository, ScheduleUpdate, SettingsRepository, Student, StudentQuery,
    StudentRepository, DEFAULT_PRICE_CENTS,
};
use rijschool_domain::{
    BookingRejection, BookingStatus, ExamRecord, ExamStatus, LicenseCategories, LicenseCategory,
    NewsletterCategory, PaymentStatus,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

struct TestDb {
    pool: SqlitePool,
    _dir: TempDir,
}

async fn test_db() -> TestDb {
    let dir = TempDir::new().expect("temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("rijschool.db").display()),
        max_connections: 5,
    };
    let pool = initialize_database(&config).await.expect("database");
    TestDb { pool, _dir: dir }
}

fn student_request(name: &str, id_card: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        name: name.to_string(),
        contact: "+5978123456".to_string(),
        address: "Keizerstraat 1, Paramaribo".to_string(),
        id_card_number: id_card.to_string(),
        license_category: LicenseCategory::A,
        agreed_price_cents: DEFAULT_PRICE_CENTS,
        passed_exams: LicenseCategories::default(),
        registered_at: None,
    }
}

async fn student_with_theory(db: &TestDb, name: &str, id_card: &str) -> Student {
    let students = StudentRepository::new(db.pool.clone());
    let student = students.create(&student_request(name, id_card)).await.unwrap();
    students
        .update_exams(
            &student.public_id,
            ExamRecord {
                theory_status: ExamStatus::Passed,
                ..ExamRecord::default()
            },
        )
        .await
        .unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 3).unwrap()
}

fn booking(student: &Student, date: NaiveDate) -> BookingRequest {
    BookingRequest {
        student_public_id: student.public_id.clone(),
        lesson_date: date,
        instructor_public_id: None,
    }
}

fn rejection(result: Result<impl std::fmt::Debug, BookingError>) -> BookingRejection {
    match result {
        Err(BookingError::Rejected(reason)) => reason,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn booking_checks_run_in_order() {
    let db = test_db().await;
    let bookings = BookingRepository::new(db.pool.clone());
    let students = StudentRepository::new(db.pool.clone());

    let unknown = BookingRequest {
        student_public_id: "does-not-exist".to_string(),
        lesson_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        instructor_public_id: None,
    };
    assert_eq!(
        rejection(bookings.book_lesson(&unknown).await),
        BookingRejection::StudentNotFound
    );

    // Theory is checked before the weekday: a Saturday still reports theory.
    let fresh = students.create(&student_request("Ravi", "FZ-100")).await.unwrap();
    let saturday = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    assert_eq!(
        rejection(bookings.book_lesson(&booking(&fresh, saturday)).await),
        BookingRejection::TheoryNotPassed
    );

    let ready = student_with_theory(&db, "Anjali", "FZ-101").await;
    assert_eq!(
        rejection(bookings.book_lesson(&booking(&ready, saturday)).await),
        BookingRejection::WeekendDate
    );

    // No instructor exists yet.
    assert_eq!(
        rejection(bookings.book_lesson(&booking(&ready, monday())).await),
        BookingRejection::NoInstructorAvailable
    );

    InstructorRepository::new(db.pool.clone())
        .create(&CreateInstructorRequest {
            name: "Mr. Pawiro".to_string(),
            email: None,
            phone: None,
        })
        .await
        .unwrap();

    let booked = bookings.book_lesson(&booking(&ready, monday())).await.unwrap();
    assert_eq!(booked.status, BookingStatus::Scheduled);
    assert_eq!(booked.lesson_date, monday());

    assert_eq!(
        rejection(bookings.book_lesson(&booking(&ready, monday())).await),
        BookingRejection::AlreadyBooked
    );
}

#[tokio::test]
async fn full_slot_rejects_before_double_booking() {
    let db = test_db().await;
    let instructors = InstructorRepository::new(db.pool.clone());
    let bookings = BookingRepository::new(db.pool.clone());

    let instructor = instructors
        .create(&CreateInstructorRequest {
            name: "Mevrouw Lie".to_string(),
            email: None,
            phone: None,
        })
        .await
        .unwrap();
    let schedules = instructors.schedules_for(instructor.id).await.unwrap();
    let monday_schedule = schedules
        .iter()
        .find(|s| s.day_of_week == rijschool_domain::Weekday::Monday)
        .unwrap();
    instructors
        .update_schedules(
            instructor.id,
            &[ScheduleUpdate {
                schedule_public_id: monday_schedule.public_id.clone(),
                is_available: true,
                max_students: 1,
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
            }],
        )
        .await
        .unwrap();

    let first = student_with_theory(&db, "First", "FZ-200").await;
    let second = student_with_theory(&db, "Second", "FZ-201").await;

    let taken = bookings.book_lesson(&booking(&first, monday())).await.unwrap();
    assert_eq!(
        rejection(bookings.book_lesson(&booking(&second, monday())).await),
        BookingRejection::SlotFull
    );
    // The seat holder also hits the capacity check before the same-day check.
    assert_eq!(
        rejection(bookings.book_lesson(&booking(&first, monday())).await),
        BookingRejection::SlotFull
    );

    // Cancelling frees the seat.
    let change = bookings.cancel(&taken.public_id).await.unwrap();
    assert!(change.changed);
    bookings.book_lesson(&booking(&second, monday())).await.unwrap();
}

#[tokio::test]
async fn concurrent_bookings_never_exceed_capacity() {
    let db = test_db().await;
    let instructors = InstructorRepository::new(db.pool.clone());
    instructors
        .create(&CreateInstructorRequest {
            name: "Solo".to_string(),
            email: None,
            phone: None,
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let student = student_with_theory(&db, &format!("Racer {i}"), &format!("RC-{i}")).await;
        let pool = db.pool.clone();
        handles.push(tokio::spawn(async move {
            BookingRepository::new(pool)
                .book_lesson(&booking(&student, monday()))
                .await
        }));
    }

    let mut admitted = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(BookingError::Rejected(BookingRejection::SlotFull)) => full += 1,
            Err(other) => panic!("unexpected booking error: {other:?}"),
        }
    }

    assert_eq!(admitted, 5, "default schedules seat five students");
    assert_eq!(full, 3);

    let (active,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM lesson_bookings WHERE lesson_date = ? AND status != 'CANCELLED'",
    )
    .bind(monday())
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(active, 5);
}

#[tokio::test]
async fn capacity_trigger_guards_direct_inserts() {
    let db = test_db().await;
    let instructor = InstructorRepository::new(db.pool.clone())
        .create(&CreateInstructorRequest {
            name: "Trigger".to_string(),
            email: None,
            phone: None,
        })
        .await
        .unwrap();
    sqlx::query("UPDATE lesson_schedules SET max_students = 1 WHERE instructor_id = ?")
        .bind(instructor.id)
        .execute(&db.pool)
        .await
        .unwrap();
    let (schedule_id,): (i64,) = sqlx::query_as(
        "SELECT id FROM lesson_schedules WHERE instructor_id = ? AND day_of_week = 'MONDAY'",
    )
    .bind(instructor.id)
    .fetch_one(&db.pool)
    .await
    .unwrap();

    let a = student_with_theory(&db, "A", "TR-1").await;
    let b = student_with_theory(&db, "B", "TR-2").await;

    let insert = "INSERT INTO lesson_bookings (public_id, student_id, schedule_id, lesson_date, status, created_at, updated_at) \
                  VALUES (?, ?, ?, '2030-06-03', 'SCHEDULED', '2030-01-01T00:00:00+00:00', '2030-01-01T00:00:00+00:00')";
    sqlx::query(insert)
        .bind("manual-1")
        .bind(a.id)
        .bind(schedule_id)
        .execute(&db.pool)
        .await
        .unwrap();

    let err = sqlx::query(insert)
        .bind("manual-2")
        .bind(b.id)
        .bind(schedule_id)
        .execute(&db.pool)
        .await
        .unwrap_err();
    assert!(matches!(
        BookingError::from(err),
        BookingError::Rejected(BookingRejection::SlotFull)
    ));
}

#[tokio::test]
async fn completed_lessons_cannot_be_cancelled() {
    let db = test_db().await;
    InstructorRepository::new(db.pool.clone())
        .first_active_or_default()
        .await
        .unwrap();
    let bookings = BookingRepository::new(db.pool.clone());
    let student = student_with_theory(&db, "Done", "CP-1").await;

    let booked = bookings.book_lesson(&booking(&student, monday())).await.unwrap();
    let completed = bookings.complete(&booked.public_id).await.unwrap();
    assert!(completed.changed);
    assert_eq!(completed.booking.status, BookingStatus::Completed);

    let again = bookings.complete(&booked.public_id).await.unwrap();
    assert!(!again.changed);

    assert_eq!(
        rejection(bookings.cancel(&booked.public_id).await),
        BookingRejection::CompletedLessonCannotBeCancelled
    );
    assert_eq!(
        rejection(bookings.cancel("missing").await),
        BookingRejection::BookingNotFound
    );

    let detail = bookings.find_detail(&booked.public_id).await.unwrap().unwrap();
    assert_eq!(detail.status, BookingStatus::Completed);
    assert_eq!(detail.instructor_name, "Default Instructor");
}

#[tokio::test]
async fn instructor_stats_count_by_status() {
    let db = test_db().await;
    let instructor = InstructorRepository::new(db.pool.clone())
        .first_active_or_default()
        .await
        .unwrap();
    let bookings = BookingRepository::new(db.pool.clone());

    let a = student_with_theory(&db, "A", "ST-1").await;
    let b = student_with_theory(&db, "B", "ST-2").await;
    let c = student_with_theory(&db, "C", "ST-3").await;

    let tuesday = NaiveDate::from_ymd_opt(2030, 6, 4).unwrap();
    bookings.book_lesson(&booking(&a, monday())).await.unwrap();
    let cancelled = bookings.book_lesson(&booking(&b, monday())).await.unwrap();
    let completed = bookings.book_lesson(&booking(&c, tuesday)).await.unwrap();
    bookings.cancel(&cancelled.public_id).await.unwrap();
    bookings.complete(&completed.public_id).await.unwrap();

    let stats = bookings
        .stats_for_instructor(instructor.id, monday())
        .await
        .unwrap();
    assert_eq!(stats.total_bookings, 3);
    assert_eq!(stats.this_week_bookings, 1);
    assert_eq!(stats.cancelled_bookings, 1);
    assert_eq!(stats.completed_bookings, 1);

    let open = bookings.list_open_for_instructor(instructor.id).await.unwrap();
    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|b| b.status != BookingStatus::Completed));
}

#[tokio::test]
async fn exam_updates_downgrade_practical_without_theory() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    let student = students.create(&student_request("Exam", "EX-1")).await.unwrap();

    let attempt = students
        .update_exams(
            &student.public_id,
            ExamRecord {
                theory_status: ExamStatus::NotPassed,
                practical_status: ExamStatus::Passed,
                ..ExamRecord::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(attempt.practical_status, ExamStatus::NotPassed);

    let both = students
        .update_exams(
            &student.public_id,
            ExamRecord {
                theory_status: ExamStatus::Passed,
                practical_status: ExamStatus::Passed,
                ..ExamRecord::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(both.practical_status, ExamStatus::Passed);

    let reverted = students
        .update_exams(
            &student.public_id,
            ExamRecord {
                theory_status: ExamStatus::NotPassed,
                ..both.exams()
            },
        )
        .await
        .unwrap();
    assert_eq!(reverted.theory_status, ExamStatus::NotPassed);
    assert_eq!(reverted.practical_status, ExamStatus::NotPassed);
}

#[tokio::test]
async fn document_saves_keep_original_submission_time() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    let documents = DocumentRepository::new(db.pool.clone());
    let student = students.create(&student_request("Docs", "DC-1")).await.unwrap();

    let submit = |doc_type: &str, is_submitted: bool| DocumentSubmission {
        doc_type: doc_type.to_string(),
        is_submitted,
    };

    let first = documents
        .save_submissions(student.id, &[submit("Pasfoto", true), submit("Plakzegels", false)])
        .await
        .unwrap();
    let original = first
        .iter()
        .find(|d| d.doc_type == "Pasfoto")
        .and_then(|d| d.submitted_at)
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let second = documents
        .save_submissions(student.id, &[submit("Pasfoto", true), submit("Plakzegels", true)])
        .await
        .unwrap();
    let pasfoto = second.iter().find(|d| d.doc_type == "Pasfoto").unwrap();
    assert_eq!(pasfoto.submitted_at, Some(original));
    let plakzegels = second.iter().find(|d| d.doc_type == "Plakzegels").unwrap();
    assert!(plakzegels.is_submitted);
    assert!(plakzegels.submitted_at.unwrap() > original);

    let record = students.find_record(&student.public_id).await.unwrap().unwrap();
    assert_eq!(
        record.missing_documents(),
        vec!["Rijbewijsuittreksel", "Leges bewijs", "Doktersverklaring", "Kopie ID/Rijbewijs"]
    );

    let third = documents
        .save_submissions(student.id, &[submit("Pasfoto", false)])
        .await
        .unwrap();
    let pasfoto = third.iter().find(|d| d.doc_type == "Pasfoto").unwrap();
    assert!(!pasfoto.is_submitted);
    assert!(pasfoto.submitted_at.is_none());

    let upload = documents
        .attach_file(student.id, "Doktersverklaring", "1700000000000-brief.pdf")
        .await
        .unwrap();
    assert!(upload.is_submitted);
    assert_eq!(upload.file_name.as_deref(), Some("1700000000000-brief.pdf"));
}

#[tokio::test]
async fn document_save_replaces_the_whole_checklist() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    let documents = DocumentRepository::new(db.pool.clone());
    let student = students.create(&student_request("Checklist", "DC-2")).await.unwrap();

    let submit = |doc_type: &str| DocumentSubmission {
        doc_type: doc_type.to_string(),
        is_submitted: true,
    };

    documents
        .save_submissions(student.id, &[submit("Pasfoto"), submit("Plakzegels")])
        .await
        .unwrap();
    let saved = documents
        .save_submissions(student.id, &[submit("Pasfoto")])
        .await
        .unwrap();

    let plakzegels = saved.iter().find(|d| d.doc_type == "Plakzegels").unwrap();
    assert!(!plakzegels.is_submitted);
    assert!(plakzegels.submitted_at.is_none());

    let record = students.find_record(&student.public_id).await.unwrap().unwrap();
    assert_eq!(
        record.missing_documents(),
        vec![
            "Rijbewijsuittreksel",
            "Leges bewijs",
            "Plakzegels",
            "Doktersverklaring",
            "Kopie ID/Rijbewijs"
        ]
    );

    let cleared = documents.save_submissions(student.id, &[]).await.unwrap();
    assert!(cleared.iter().all(|d| !d.is_submitted));
}

#[tokio::test]
async fn student_search_treats_like_wildcards_literally() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    students.create(&student_request("Anand Jagessar", "LK-1")).await.unwrap();
    students.create(&student_request("Rijles_Groep 100%", "LK-2")).await.unwrap();

    let search = |text: &str| StudentQuery {
        text: Some(text.to_string()),
        ..StudentQuery::default()
    };

    let underscore = students.list(&search("_")).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "Rijles_Groep 100%");

    let percent = students.list(&search("%")).await.unwrap();
    assert_eq!(percent.len(), 1);

    assert_eq!(students.list(&search("s_G")).await.unwrap().len(), 1);
    assert!(students.list(&search("\\")).await.unwrap().is_empty());
}

#[tokio::test]
async fn student_list_filters_by_text_and_registration_dates() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    let payments = PaymentRepository::new(db.pool.clone());

    let mut early = student_request("Shanti Ramdin", "LS-1");
    early.registered_at = Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap());
    let early = students.create(&early).await.unwrap();

    let mut late = student_request("Marco Ramdin", "LS-2");
    late.registered_at = Some(Utc.with_ymd_and_hms(2025, 3, 31, 23, 30, 0).unwrap());
    late.agreed_price_cents = 1_000;
    let late = students.create(&late).await.unwrap();

    let mut other = student_request("Ingrid Tjon", "LS-3");
    other.registered_at = Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap());
    students.create(&other).await.unwrap();

    let by_name = students
        .list(&StudentQuery {
            text: Some("ramdin".to_string()),
            ..StudentQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 2);
    assert_eq!(by_name[0].public_id, late.public_id, "newest first");

    let by_registration = students
        .list(&StudentQuery {
            text: Some(early.id.to_string()),
            ..StudentQuery::default()
        })
        .await
        .unwrap();
    assert!(by_registration.iter().any(|s| s.id == early.id));

    let in_range = students
        .list(&StudentQuery {
            registered_from: NaiveDate::from_ymd_opt(2025, 2, 1),
            registered_to: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..StudentQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].public_id, late.public_id);

    payments
        .create(
            late.id,
            &CreatePaymentRequest {
                amount_cents: 1_000,
                method: Some("cash".to_string()),
                paid_at: None,
            },
        )
        .await
        .unwrap();
    let records = students.list_records(&StudentQuery::default()).await.unwrap();
    let paid: Vec<_> = records
        .iter()
        .filter(|r| r.ledger().status == PaymentStatus::Paid)
        .map(|r| r.student.public_id.clone())
        .collect();
    assert_eq!(paid, vec![late.public_id.clone()]);
}

#[tokio::test]
async fn payments_must_be_positive() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    let student = students.create(&student_request("Pay", "PY-1")).await.unwrap();

    let err = PaymentRepository::new(db.pool.clone())
        .create(
            student.id,
            &CreatePaymentRequest {
                amount_cents: 0,
                method: None,
                paid_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::ValidationError(_)));
}

#[tokio::test]
async fn duplicate_id_card_is_reported() {
    let db = test_db().await;
    let students = StudentRepository::new(db.pool.clone());
    students.create(&student_request("One", "DUP-1")).await.unwrap();
    let err = students
        .create(&student_request("Two", "DUP-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(_)));
}

#[tokio::test]
async fn newsletters_publish_and_unpublish() {
    let db = test_db().await;
    let newsletters = NewsletterRepository::new(db.pool.clone());

    let draft = newsletters
        .create(&CreateNewsletterRequest {
            title: "Examenrooster".to_string(),
            content: "Nieuwe data bekend".to_string(),
            category: NewsletterCategory::Important,
            publish: false,
        })
        .await
        .unwrap();
    assert!(!draft.is_published);
    assert!(draft.published_at.is_none());
    assert!(newsletters.list_published().await.unwrap().is_empty());

    let published = newsletters.set_published(&draft.public_id, true).await.unwrap();
    assert!(published.published_at.is_some());
    assert_eq!(newsletters.list_published().await.unwrap().len(), 1);

    let hidden = newsletters.set_published(&draft.public_id, false).await.unwrap();
    assert!(hidden.published_at.is_none());

    newsletters.delete(&draft.public_id).await.unwrap();
    assert!(matches!(
        newsletters.delete(&draft.public_id).await,
        Err(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn settings_default_and_update() {
    let db = test_db().await;
    let settings = SettingsRepository::new(db.pool.clone());

    assert_eq!(settings.get_or_create().await.unwrap().default_price_cents, 250_000);
    assert_eq!(
        settings.update_default_price(300_000).await.unwrap().default_price_cents,
        300_000
    );
    assert_eq!(settings.get_or_create().await.unwrap().default_price_cents, 300_000);
    assert!(settings.update_default_price(-1).await.is_err());
}

#[tokio::test]
async fn schedule_updates_are_validated() {
    let db = test_db().await;
    let instructors = InstructorRepository::new(db.pool.clone());
    let instructor = instructors.first_active_or_default().await.unwrap();
    let schedules = instructors.schedules_for(instructor.id).await.unwrap();
    assert_eq!(schedules.len(), 5);

    let update = |max_students: i64, start: &str, end: &str| ScheduleUpdate {
        schedule_public_id: schedules[0].public_id.clone(),
        is_available: false,
        max_students,
        start_time: start.to_string(),
        end_time: end.to_string(),
    };

    for bad in [update(0, "09:00", "17:00"), update(3, "17:00", "09:00"), update(3, "9", "17:00")] {
        assert!(matches!(
            instructors.update_schedules(instructor.id, &[bad]).await,
            Err(DatabaseError::ValidationError(_))
        ));
    }

    let updated = instructors
        .update_schedules(instructor.id, &[update(3, "10:00", "14:00")])
        .await
        .unwrap();
    assert!(!updated[0].is_available);
    assert_eq!(updated[0].max_students, 3);

    let available = instructors.list_available_schedules().await.unwrap();
    assert_eq!(available.len(), 4);
}
