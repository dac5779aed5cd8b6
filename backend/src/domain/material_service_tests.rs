//! Tests for the material catalog service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockDirectoryRepository, MockEnrollmentRepository, MockMaterialRepository,
};
use crate::domain::{
    Credits, ErrorCode, Identity, IdentityDraft, IdentityId, Lecturer, LecturerDraft,
    PasswordHash, StoredFile, Subject, SubjectDraft, authorize,
};

fn capability_for(role: Role) -> Capability {
    let identity = Identity::new(IdentityDraft {
        id: IdentityId::random(),
        handle: "tranthib".to_owned(),
        email: "tranthib@example.edu".to_owned(),
        password_hash: PasswordHash::derive("hunter22"),
        role,
        is_active: true,
    })
    .expect("valid identity");
    authorize(&identity, role).expect("matching role authorises")
}

#[fixture]
fn lecturer_cap() -> Capability {
    capability_for(Role::Lecturer)
}

fn request(subject_id: SubjectId, uploaded_by: LecturerId) -> NewMaterial {
    NewMaterial {
        subject_id,
        uploaded_by,
        title: "Lecture 1 slides".to_owned(),
        description: None,
        file: Some(
            StoredFile::try_new("materials/lecture-1.pdf", "pdf", 2048).expect("valid file"),
        ),
    }
}

fn known_subject_and_lecturer(
    subject_id: SubjectId,
    lecturer_id: LecturerId,
) -> (MockDirectoryRepository, MockEnrollmentRepository) {
    let mut directory = MockDirectoryRepository::new();
    directory.expect_find_subject().returning(move |_| {
        Ok(Some(
            Subject::new(SubjectDraft {
                id: subject_id,
                code: "INT1340".to_owned(),
                name: "Database Systems".to_owned(),
                credits: Credits::try_new(3).expect("valid credits"),
                theory_hours: None,
                practice_hours: None,
                description: None,
            })
            .expect("valid subject"),
        ))
    });
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_find_lecturer().returning(move |_| {
        Ok(Some(
            Lecturer::new(LecturerDraft {
                id: lecturer_id,
                identity_id: IdentityId::random(),
                code: "GV012".to_owned(),
                full_name: "Tran Thi B".to_owned(),
                department: None,
                expertise: None,
                phone: None,
                degree: None,
            })
            .expect("valid lecturer"),
        ))
    });
    (directory, enrollment)
}

fn stored_material(id: MaterialId, uploaded_by: LecturerId) -> Material {
    Material::new(MaterialDraft {
        id,
        subject_id: SubjectId::random(),
        uploaded_by,
        title: "Lecture 1 slides".to_owned(),
        description: None,
        file: None,
        download_count: 3,
    })
    .expect("valid material")
}

#[rstest]
#[tokio::test]
async fn register_material_starts_the_counter_at_zero(lecturer_cap: Capability) {
    let subject_id = SubjectId::random();
    let lecturer_id = LecturerId::random();
    let (directory, enrollment) = known_subject_and_lecturer(subject_id, lecturer_id);

    let mut materials = MockMaterialRepository::new();
    materials
        .expect_insert()
        .times(1)
        .withf(|material| material.download_count() == 0)
        .return_once(|_| Ok(()));

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(enrollment),
        Arc::new(directory),
    );
    let material = service
        .register_material(&lecturer_cap, request(subject_id, lecturer_id))
        .await
        .expect("registration succeeds");
    assert_eq!(material.uploaded_by(), lecturer_id);
    assert_eq!(material.size_label(), "2.0 KB");
}

#[rstest]
#[tokio::test]
async fn registration_requires_the_lecturer_capability() {
    let student_cap = capability_for(Role::Student);
    let service = MaterialService::new(
        Arc::new(MockMaterialRepository::new()),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    let err = service
        .register_material(&student_cap, request(SubjectId::random(), LecturerId::random()))
        .await
        .expect_err("students cannot upload materials");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn registering_for_an_unknown_subject_is_not_found(lecturer_cap: Capability) {
    let mut directory = MockDirectoryRepository::new();
    directory.expect_find_subject().return_once(|_| Ok(None));

    let service = MaterialService::new(
        Arc::new(MockMaterialRepository::new()),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(directory),
    );
    let err = service
        .register_material(&lecturer_cap, request(SubjectId::random(), LecturerId::random()))
        .await
        .expect_err("unknown subject must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn record_download_bumps_the_counter() {
    let mut materials = MockMaterialRepository::new();
    materials
        .expect_increment_download_count()
        .times(1)
        .return_once(|_| Ok(true));

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    service
        .record_download(MaterialId::random())
        .await
        .expect("download counts");
}

#[tokio::test]
async fn record_download_for_a_missing_material_is_not_found() {
    let mut materials = MockMaterialRepository::new();
    materials
        .expect_increment_download_count()
        .return_once(|_| Ok(false));

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    let err = service
        .record_download(MaterialId::random())
        .await
        .expect_err("missing material must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn only_the_uploader_may_delete_a_material(lecturer_cap: Capability) {
    let id = MaterialId::random();
    let uploader = LecturerId::random();
    let other = LecturerId::random();

    let mut materials = MockMaterialRepository::new();
    materials
        .expect_find()
        .return_once(move |_| Ok(Some(stored_material(id, uploader))));
    materials.expect_delete().times(0);

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    let err = service
        .delete_material(&lecturer_cap, id, other)
        .await
        .expect_err("non-uploader must be rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn the_uploader_deletes_their_own_material(lecturer_cap: Capability) {
    let id = MaterialId::random();
    let uploader = LecturerId::random();

    let mut materials = MockMaterialRepository::new();
    materials
        .expect_find()
        .return_once(move |_| Ok(Some(stored_material(id, uploader))));
    materials.expect_delete().times(1).return_once(|_| Ok(true));

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    service
        .delete_material(&lecturer_cap, id, uploader)
        .await
        .expect("uploader may delete");
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_material_is_not_found(lecturer_cap: Capability) {
    let mut materials = MockMaterialRepository::new();
    materials.expect_find().return_once(|_| Ok(None));

    let service = MaterialService::new(
        Arc::new(materials),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );
    let err = service
        .delete_material(&lecturer_cap, MaterialId::random(), LecturerId::random())
        .await
        .expect_err("missing material must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
