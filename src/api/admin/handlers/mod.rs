mod create;
mod list;
mod manage;
mod sections;

pub(super) use create::{create_assessment, duplicate_assessment};
pub(super) use list::list_assessments;
pub(super) use manage::{delete_assessment, export_template, get_assessment, update_assessment};
pub(super) use sections::{update_question, update_section};
