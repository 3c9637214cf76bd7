use crate::{
    CompanyFilter, CompanyPatch, CompanyRepository, JobFilter, JobPatch, JobRepository,
    JoblyError, NewCompany, NewJob,
};

fn titles(jobs: &[crate::Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.title.as_str()).collect()
}

// ---- Fixtures ----

pub async fn seed_companies(companies: &dyn CompanyRepository) {
    for i in 1..=3 {
        let company = NewCompany::new(format!("c{i}"), format!("C{i}"), format!("Desc{i}"))
            .num_employees(i)
            .logo_url(format!("http://c{i}.img"));
        companies.create(company).await.unwrap();
    }
}

/// Three companies and the jobs j1 (no equity), j2 and j3 (with equity).
pub async fn seed_jobly_data(companies: &dyn CompanyRepository, jobs: &dyn JobRepository) {
    seed_companies(companies).await;
    let fixtures = vec![
        NewJob::new("j1", "c1").salary(100000).equity(0.0),
        NewJob::new("j2", "c2").salary(150000).equity(0.081),
        NewJob::new("j3", "c3").salary(400000).equity(0.032),
    ];
    for job in fixtures {
        jobs.create(job).await.unwrap();
    }
}

// ---- Job Repository Certification Tests ----

pub async fn test_create_should_store_and_return_job(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_companies(companies).await;

    let created = jobs
        .create(NewJob::new("newJob", "c1").salary(50000).equity(0.0))
        .await
        .unwrap();
    assert_eq!(created.title, "newJob");
    assert_eq!(created.salary, Some(50000));
    assert_eq!(created.equity, Some(0.0));
    assert_eq!(created.company_handle, "c1");

    let found = jobs.read(created.id).await.unwrap();
    assert_eq!(found, created);
}

pub async fn test_create_duplicate_title_should_conflict(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_companies(companies).await;

    jobs.create(NewJob::new("dupe", "c1")).await.unwrap();
    let err = jobs.create(NewJob::new("dupe", "c2")).await.unwrap_err();
    assert!(matches!(err, JoblyError::Conflict(_)), "got {err:?}");
}

pub async fn test_create_for_unknown_company_should_be_invalid(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_companies(companies).await;

    let err = jobs.create(NewJob::new("orphan", "nope")).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidInput(_)), "got {err:?}");
}

pub async fn test_created_equity_reads_back_as_float(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_companies(companies).await;

    let created = jobs
        .create(NewJob::new("j2", "c2").salary(150000).equity(0.081))
        .await
        .unwrap();

    let filter = JobFilter::default().min_salary(150000).has_equity(true);
    let results = jobs.list(&filter).await.unwrap();
    assert_eq!(results, vec![created]);
    assert_eq!(results[0].equity, Some(0.081));
}

pub async fn test_list_without_filter_returns_all_by_title(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    let results = jobs.list(&JobFilter::default()).await.unwrap();
    assert_eq!(titles(&results), vec!["j1", "j2", "j3"]);
    assert_eq!(results[0].equity, Some(0.0));
    assert_eq!(results[1].equity, Some(0.081));
    assert_eq!(results[2].equity, Some(0.032));
}

pub async fn test_list_filters_by_title(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    let results = jobs
        .list(&JobFilter::default().title_contains("J1"))
        .await
        .unwrap();
    assert_eq!(titles(&results), vec!["j1"]);
}

pub async fn test_list_filters_by_min_salary(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    let results = jobs
        .list(&JobFilter::default().min_salary(300000))
        .await
        .unwrap();
    assert_eq!(titles(&results), vec!["j3"]);
}

pub async fn test_list_filters_by_has_equity(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    let with_equity = jobs
        .list(&JobFilter::default().has_equity(true))
        .await
        .unwrap();
    assert_eq!(titles(&with_equity), vec!["j2", "j3"]);

    let unfiltered = jobs
        .list(&JobFilter::default().has_equity(false))
        .await
        .unwrap();
    assert_eq!(titles(&unfiltered), vec!["j1", "j2", "j3"]);
}

pub async fn test_list_combines_filters(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    let filter = JobFilter::default()
        .title_contains("j")
        .min_salary(300000)
        .has_equity(true);
    let results = jobs.list(&filter).await.unwrap();
    assert_eq!(titles(&results), vec!["j3"]);
}

pub async fn test_read_by_title(companies: &dyn CompanyRepository, jobs: &dyn JobRepository) {
    seed_jobly_data(companies, jobs).await;

    let job = jobs.read_by_title("j1").await.unwrap();
    assert_eq!(job.salary, Some(100000));
    assert_eq!(job.company_handle, "c1");

    let err = jobs.read_by_title("fake job").await.unwrap_err();
    assert!(err.is_not_found());
}

pub async fn test_update_should_change_supplied_fields(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;
    let j2 = jobs.read_by_title("j2").await.unwrap();

    let patch = JobPatch {
        title: Some("New".into()),
        salary: Some(Some(150500)),
        ..Default::default()
    };
    let updated = jobs.update(j2.id, patch).await.unwrap();
    assert_eq!(updated.id, j2.id);
    assert_eq!(updated.title, "New");
    assert_eq!(updated.salary, Some(150500));
    assert_eq!(updated.equity, j2.equity);
    assert_eq!(updated.company_handle, "c2");

    assert!(jobs.read_by_title("j2").await.unwrap_err().is_not_found());
    assert_eq!(jobs.read_by_title("New").await.unwrap(), updated);
}

pub async fn test_update_should_accept_nulls(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;
    let j1 = jobs.read_by_title("j1").await.unwrap();

    let patch = JobPatch {
        salary: Some(None),
        equity: Some(None),
        ..Default::default()
    };
    jobs.update(j1.id, patch).await.unwrap();

    let found = jobs.read(j1.id).await.unwrap();
    assert_eq!(found.salary, None);
    assert_eq!(found.equity, None);
    assert_eq!(found.title, "j1");
}

pub async fn test_update_missing_job_should_not_be_found(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;
    let before = jobs.list(&JobFilter::default()).await.unwrap();

    let patch = JobPatch {
        salary: Some(Some(1)),
        ..Default::default()
    };
    let err = jobs.update(-1, patch).await.unwrap_err();
    assert!(err.is_not_found());

    let after = jobs.list(&JobFilter::default()).await.unwrap();
    assert_eq!(before, after);
}

pub async fn test_update_with_empty_patch_should_be_invalid(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;
    let j1 = jobs.read_by_title("j1").await.unwrap();

    let err = jobs.update(j1.id, JobPatch::default()).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidInput(_)), "got {err:?}");
}

pub async fn test_remove_should_delete_job(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;
    let j1 = jobs.read_by_title("j1").await.unwrap();

    jobs.remove(j1.id).await.unwrap();
    assert!(jobs.read(j1.id).await.unwrap_err().is_not_found());

    let err = jobs.remove(j1.id).await.unwrap_err();
    assert!(err.is_not_found());
}

// ---- Company Repository Certification Tests ----

pub async fn test_company_list_filters(companies: &dyn CompanyRepository) {
    seed_companies(companies).await;

    let all = companies.list(&CompanyFilter::default()).await.unwrap();
    let handles: Vec<&str> = all.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, vec!["c1", "c2", "c3"]);

    let filter = CompanyFilter {
        name_like: Some("c".into()),
        min_employees: Some(2),
        max_employees: Some(2),
    };
    let ranged = companies.list(&filter).await.unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].handle, "c2");

    let inverted = CompanyFilter {
        min_employees: Some(3),
        max_employees: Some(1),
        ..Default::default()
    };
    let err = companies.list(&inverted).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidInput(_)));
}

pub async fn test_company_update_maps_columns(companies: &dyn CompanyRepository) {
    seed_companies(companies).await;

    let patch = CompanyPatch {
        num_employees: Some(Some(42)),
        logo_url: Some(None),
        ..Default::default()
    };
    let updated = companies.update("c1", patch).await.unwrap();
    assert_eq!(updated.num_employees, Some(42));
    assert_eq!(updated.logo_url, None);
    assert_eq!(updated.name, "C1");

    let err = companies
        .update("nope", CompanyPatch {
            name: Some("x".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

pub async fn test_company_duplicate_should_conflict(companies: &dyn CompanyRepository) {
    seed_companies(companies).await;

    let err = companies
        .create(NewCompany::new("c1", "Other", "dup"))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, JoblyError::Conflict(m) if m == "Duplicate company: c1"),
        "got {err:?}"
    );

    let err = companies
        .create(NewCompany::new("c9", "C1", "same name"))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, JoblyError::Conflict(m) if m == "Duplicate company name: C1"),
        "got {err:?}"
    );
}

pub async fn test_company_remove_cascades_to_jobs(
    companies: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_jobly_data(companies, jobs).await;

    companies.remove("c1").await.unwrap();
    assert!(companies.read("c1").await.unwrap_err().is_not_found());
    assert!(jobs.read_by_title("j1").await.unwrap_err().is_not_found());
    assert!(companies.remove("c1").await.unwrap_err().is_not_found());
}
