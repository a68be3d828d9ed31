//! Demo catalogue loaded into empty namespaces so a fresh install has something to browse.

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Job, JobId, Modality, Student, StudentId,
};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn jobs() -> Vec<Job> {
    vec![
        Job {
            id: JobId::from("1"),
            title: "Estágio em Desenvolvimento Web".to_string(),
            company: "TechCorp Inovação".to_string(),
            location: "São Paulo, SP".to_string(),
            modality: Modality::Remote,
            workload: "20h/semana".to_string(),
            flex_score: 92,
            salary: Some("R$ 1.500/mês".to_string()),
            description: "Buscamos estudante de TI para desenvolvimento web.".to_string(),
            requirements: tags(&["Cursando TI", "HTML, CSS, JavaScript"]),
            benefits: tags(&["Vale transporte", "Vale refeição", "Plano de saúde"]),
            accessibility: tags(&[
                "Trabalho remoto",
                "Horários flexíveis",
                "Equipamento fornecido",
            ]),
            schedule: tags(&["Horários negociáveis"]),
            posted_date: "Há 2 dias".to_string(),
            category: "Tecnologia".to_string(),
        },
        Job {
            id: JobId::from("2"),
            title: "Bolsa de Pesquisa em Biologia".to_string(),
            company: "Universidade Federal".to_string(),
            location: "Rio de Janeiro, RJ".to_string(),
            modality: Modality::Hybrid,
            workload: "15h/semana".to_string(),
            flex_score: 78,
            salary: Some("R$ 800/mês".to_string()),
            description: "Pesquisa em microbiologia aplicada.".to_string(),
            requirements: tags(&["Cursando Biologia", "Interesse em pesquisa"]),
            benefits: tags(&["Bolsa de estudos", "Certificado"]),
            accessibility: tags(&["Rampas de acesso", "Banheiros adaptados"]),
            schedule: tags(&["Manhã", "Tarde"]),
            posted_date: "Há 5 dias".to_string(),
            category: "Pesquisa".to_string(),
        },
        Job {
            id: JobId::from("3"),
            title: "Estágio em Marketing Digital".to_string(),
            company: "Agência Criativa".to_string(),
            location: "Belo Horizonte, MG".to_string(),
            modality: Modality::Hybrid,
            workload: "30h/semana".to_string(),
            flex_score: 85,
            salary: Some("R$ 1.200/mês".to_string()),
            description: "Apoio em campanhas de marketing digital.".to_string(),
            requirements: tags(&[
                "Cursando Marketing ou Comunicação",
                "Conhecimento em redes sociais",
            ]),
            benefits: tags(&["Vale transporte", "Vale refeição"]),
            accessibility: tags(&["Trabalho remoto parcial", "Horários flexíveis"]),
            schedule: tags(&["Tarde", "Noite"]),
            posted_date: "Há 1 dia".to_string(),
            category: "Marketing".to_string(),
        },
    ]
}

struct SeedStudent {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    university: &'static str,
    course: &'static str,
    semester: &'static str,
}

const SEED_STUDENTS: [SeedStudent; 5] = [
    SeedStudent {
        id: "student1",
        name: "Ana Clara Silva",
        email: "ana.silva@email.com",
        university: "USP",
        course: "Ciência da Computação",
        semester: "5º",
    },
    SeedStudent {
        id: "student2",
        name: "Lucas Oliveira",
        email: "lucas.oliveira@email.com",
        university: "UNICAMP",
        course: "Sistemas de Informação",
        semester: "6º",
    },
    SeedStudent {
        id: "student3",
        name: "Carlos Santos",
        email: "carlos.santos@email.com",
        university: "UFRJ",
        course: "Engenharia de Software",
        semester: "4º",
    },
    SeedStudent {
        id: "student4",
        name: "Mariana Costa",
        email: "mariana.costa@email.com",
        university: "UFMG",
        course: "Biologia",
        semester: "3º",
    },
    SeedStudent {
        id: "student5",
        name: "Pedro Almeida",
        email: "pedro.almeida@email.com",
        university: "PUC-MG",
        course: "Marketing",
        semester: "7º",
    },
];

pub fn students() -> Vec<Student> {
    SEED_STUDENTS
        .iter()
        .map(|seed| Student {
            id: StudentId::from(seed.id),
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            university: Some(seed.university.to_string()),
            course: Some(seed.course.to_string()),
            semester: Some(seed.semester.to_string()),
            phone: None,
            bio: None,
        })
        .collect()
}

pub fn applications() -> Vec<Application> {
    let entries = [
        ("app1", "1", 0, "10/11/2025", ApplicationStatus::Pending),
        ("app2", "1", 1, "11/11/2025", ApplicationStatus::Pending),
        ("app3", "1", 2, "12/11/2025", ApplicationStatus::Approved),
        ("app4", "2", 3, "09/11/2025", ApplicationStatus::Pending),
        ("app5", "3", 4, "13/11/2025", ApplicationStatus::Pending),
    ];

    entries
        .into_iter()
        .map(|(id, job_id, student, applied_date, status)| {
            let student = &SEED_STUDENTS[student];
            Application {
                id: ApplicationId::from(id),
                job_id: JobId::from(job_id),
                student_id: StudentId::from(student.id),
                student_name: student.name.to_string(),
                email: student.email.to_string(),
                university: Some(student.university.to_string()),
                course: Some(student.course.to_string()),
                semester: Some(student.semester.to_string()),
                applied_date: applied_date.to_string(),
                status,
            }
        })
        .collect()
}
