use folio_kernel::error::ApiError;
use folio_kernel::safe_nanoid;
use folio_kernel::security::resource::ResourceGuard;

#[test]
fn resource_guard_accepts_generated_ids() {
    let id = safe_nanoid!();
    assert_eq!(ResourceGuard::verify(&id, "lead").unwrap(), id);
    assert_eq!(ResourceGuard::verify(format!("lead:{id}"), "lead").unwrap(), id);
}

#[test]
fn resource_guard_rejections_map_to_bad_request() {
    let err: ApiError = ResourceGuard::verify("image:../../etc", "image").unwrap_err().into();
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

    let err: ApiError = ResourceGuard::verify("account:abc", "image").unwrap_err().into();
    assert!(matches!(err, ApiError::BadRequest { .. }));
}
