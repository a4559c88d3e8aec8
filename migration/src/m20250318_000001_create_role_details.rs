//! 角色详情表（教师 / 学生 / 督导），在核心表之后单独迁移

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 教师详情
        manager
            .create_table(
                Table::create()
                    .table(FacultyProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FacultyProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FacultyProfiles::EmployeeNo).string().null())
                    .col(ColumnDef::new(FacultyProfiles::AcademicRank).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FacultyProfiles::Table, FacultyProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生详情
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentProfiles::StudentNo).string().null())
                    .col(ColumnDef::new(StudentProfiles::YearLevel).integer().null())
                    .col(ColumnDef::new(StudentProfiles::Section).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProfiles::Table, StudentProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 督导详情
        manager
            .create_table(
                Table::create()
                    .table(SupervisorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupervisorProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupervisorProfiles::EmployeeNo)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(SupervisorProfiles::Position).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SupervisorProfiles::Table, SupervisorProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupervisorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FacultyProfiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum FacultyProfiles {
    #[sea_orm(iden = "faculty_profiles")]
    Table,
    UserId,
    EmployeeNo,
    AcademicRank,
}

#[derive(DeriveIden)]
enum StudentProfiles {
    #[sea_orm(iden = "student_profiles")]
    Table,
    UserId,
    StudentNo,
    YearLevel,
    Section,
}

#[derive(DeriveIden)]
enum SupervisorProfiles {
    #[sea_orm(iden = "supervisor_profiles")]
    Table,
    UserId,
    EmployeeNo,
    Position,
}
