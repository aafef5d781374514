use log::{debug, info};

use pglog_error::Result;

use crate::catalog::{Catalog, TableRef};

/// 적재 대상 준비
///
/// 1단계에서 스키마를 만들고 이전 실행의 통합 테이블을 자식 파티션과 함께
/// 모두 지운 뒤, 2단계에서 로그 서버를 준비합니다. 새 파티션은 이 함수가
/// 끝난 뒤에만 연결되므로 이전 세대와 새 세대가 섞이지 않습니다.
///
/// 같은 대상에 대해 동시에 실행하는 것은 안전하지 않습니다.
pub async fn bootstrap<C: Catalog + ?Sized>(catalog: &C, parent: &TableRef) -> Result<()> {
    // 1단계: 정리
    catalog.create_schema_if_absent(&parent.schema).await?;
    debug!("스키마 확인 완료: {}", parent.schema);

    if catalog.table_exists(parent).await? {
        catalog.drop_table_cascade(parent).await?;
        info!("기존 통합 테이블 삭제: {parent}");
    }

    // 2단계: 준비
    catalog.ensure_log_server().await?;
    debug!("로그 서버 확인 완료");

    Ok(())
}
