//! Canned support content served without calling any provider.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

/// Messages picked from at random by [`motivational_message`].
pub const MOTIVATIONAL_MESSAGES: [&str; 10] = [
    "Você está no caminho certo! Cada dia sem apostas é uma vitória.",
    "A recuperação é uma jornada, não um destino. Continue firme!",
    "Você é mais forte do que imagina. Acredite em si mesmo!",
    "Cada pequeno passo conta. Você está fazendo progresso!",
    "A vida tem muito mais a oferecer além dos jogos. Descubra!",
    "Você não está sozinho nesta jornada. Estamos aqui para ajudar!",
    "A mudança começa com uma decisão. Você já deu o primeiro passo!",
    "Seja gentil consigo mesmo. A recuperação leva tempo.",
    "Celebre suas pequenas vitórias. Elas são importantes!",
    "O futuro que você quer está sendo construído hoje. Continue!",
];

/// Fixed crisis support message pointing at the CVV hotline.
pub const CRISIS_SUPPORT_MESSAGE: &str = "Se você está passando por uma crise, lembre-se: você não está sozinho. \
Ligue para o CVV (188) ou procure ajuda profissional. \
A recuperação é possível e você merece apoio. \
Respire fundo e saiba que esta sensação vai passar.";

/// Pick one motivational message uniformly at random.
pub fn motivational_message() -> &'static str {
    let mut rng = rand::thread_rng();
    MOTIVATIONAL_MESSAGES[rng.gen_range(0..MOTIVATIONAL_MESSAGES.len())]
}

/// Return the crisis support message.
pub fn crisis_support_message() -> &'static str {
    CRISIS_SUPPORT_MESSAGE
}

/// One entry of the generic health resource list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResource {
    pub nome: &'static str,
    pub telefone: &'static str,
    pub tipo: &'static str,
    pub disponibilidade: &'static str,
    pub descricao: &'static str,
}

/// Health resources annotated with the requested city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityHealthResources {
    pub cidade: String,
    pub recursos: Vec<HealthResource>,
    pub total: usize,
    #[serde(rename = "ultimaAtualizacao")]
    pub last_updated: NaiveDateTime,
}

const HEALTH_RESOURCES: [HealthResource; 4] = [
    HealthResource {
        nome: "Centro de Valorização da Vida (CVV)",
        telefone: "188",
        tipo: "Crise",
        disponibilidade: "24h",
        descricao: "Atendimento gratuito para prevenção do suicídio",
    },
    HealthResource {
        nome: "CAPS - Centro de Atenção Psicossocial",
        telefone: "Varia por região",
        tipo: "Atenção Psicossocial",
        disponibilidade: "Segunda a Sexta, 8h às 17h",
        descricao: "Atendimento especializado em saúde mental",
    },
    HealthResource {
        nome: "Alcoólicos Anônimos",
        telefone: "Varia por região",
        tipo: "Grupo de Apoio",
        disponibilidade: "Vários horários",
        descricao: "Grupos de apoio para dependência de álcool",
    },
    HealthResource {
        nome: "Jogadores Anônimos",
        telefone: "Varia por região",
        tipo: "Grupo de Apoio",
        disponibilidade: "Vários horários",
        descricao: "Grupos de apoio para dependência de jogos",
    },
];

/// The generic resource list for `city`. The city is echoed, not used to filter.
pub fn health_resources_for_city(city: &str) -> CityHealthResources {
    let recursos = HEALTH_RESOURCES.to_vec();
    CityHealthResources {
        cidade: city.to_string(),
        total: recursos.len(),
        recursos,
        last_updated: chrono::Local::now().naive_local(),
    }
}
