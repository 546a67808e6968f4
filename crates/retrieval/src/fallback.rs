//! Safe canned answers for empty retrieval and pipeline errors.

use crate::types::Category;

/// Produces the category-specific fallback messages shown when retrieval
/// finds nothing, and the generic error message shown when the pipeline
/// itself fails. The configured contact channel is substituted into the
/// templates that point at an office phone number.
pub struct FallbackHandler {
    contact_channel: String,
}

impl FallbackHandler {
    pub fn new(contact_channel: impl Into<String>) -> Self {
        Self {
            contact_channel: contact_channel.into(),
        }
    }

    /// Fallback answer for a question in the given category.
    pub fn message_for(&self, category: Category) -> String {
        match category {
            Category::AcademicSchedule => format!(
                "죄송해요. 학사 일정 정보를 찾을 수 없어요.\n\n\
                 **확인 방법:**\n\
                 - 학사지원팀에 문의: {}\n\
                 - 학사시스템에서 학사일정 확인\n\
                 - 학교 홈페이지 > 학사안내 > 학사일정\n\n\
                 다른 궁금하신 점이 있으신가요?",
                self.contact_channel
            ),
            Category::Notice => "죄송해요. 해당 공지사항을 찾을 수 없어요.\n\n\
                 **확인 방법:**\n\
                 - 학교 홈페이지 공지사항 확인\n\
                 - 해당 부서에 직접 문의\n\
                 - 학생성장지원시스템 확인\n\n\
                 다른 궁금하신 점이 있으신가요?"
                .to_string(),
            Category::SupportProgram => format!(
                "죄송해요. 해당 지원 프로그램 정보를 찾을 수 없어요.\n\n\
                 **확인 방법:**\n\
                 - 학생지원팀에 문의: {}\n\
                 - 학생성장지원시스템 확인\n\
                 - 대학일자리플러스사업단 문의\n\n\
                 다른 궁금하신 점이 있으신가요?",
                self.contact_channel
            ),
            Category::AcademicInfo => "죄송해요. 해당 학사 용어 정보를 찾을 수 없어요.\n\n\
                 **확인 방법:**\n\
                 - 학사지원팀에 문의\n\
                 - 학생 편람 확인\n\
                 - 학교 홈페이지 참고\n\n\
                 다른 궁금하신 점이 있으신가요?"
                .to_string(),
            Category::Other => format!(
                "죄송해요. 현재 해당 질문에 대한 정보를 찾을 수 없어요.\n\n\
                 **추천 방법:**\n\
                 - 질문을 다르게 표현해보세요\n\
                 - 학교 행정실에 직접 문의해보세요 ({})\n\
                 - 아래 '상담원 연결' 버튼을 클릭해주세요\n\n\
                 다른 궁금하신 점이 있으신가요?",
                self.contact_channel
            ),
        }
    }

    /// Answer text for an internal pipeline error.
    pub fn error_message(&self) -> String {
        "죄송해요. 일시적인 오류가 발생했어요.\n\n\
         **해결 방법:**\n\
         - 잠시 후 다시 시도해주세요\n\
         - 문제가 계속되면 '상담원 연결'을 클릭해주세요\n\
         - 또는 학교 행정실에 직접 문의해주세요\n\n\
         불편을 드려 죄송합니다."
            .to_string()
    }
}
