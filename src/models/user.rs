use serde::Serialize;

/// A registered student.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub student_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields needed to register a student.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub student_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
