use phf::phf_map;

/// 科目分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SubjectCategory {
    Sciences,
    Languages,
    Humanities,
    Technical,
    Arts,
}

impl SubjectCategory {
    /// 全部分类（界面展示顺序）
    pub const ALL: [SubjectCategory; 5] = [
        SubjectCategory::Sciences,
        SubjectCategory::Languages,
        SubjectCategory::Humanities,
        SubjectCategory::Technical,
        SubjectCategory::Arts,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            SubjectCategory::Sciences => "Sciences",
            SubjectCategory::Languages => "Languages",
            SubjectCategory::Humanities => "Humanities",
            SubjectCategory::Technical => "Technical",
            SubjectCategory::Arts => "Arts",
        }
    }

    /// 该分类下的科目（界面展示顺序）
    pub fn subjects(self) -> &'static [Subject] {
        match self {
            SubjectCategory::Sciences => &[
                Subject::Mathematics,
                Subject::Biology,
                Subject::Chemistry,
                Subject::Physics,
            ],
            SubjectCategory::Languages => &[
                Subject::English,
                Subject::Kiswahili,
                Subject::French,
                Subject::German,
            ],
            SubjectCategory::Humanities => &[
                Subject::Geography,
                Subject::History,
                Subject::Cre,
                Subject::Ire,
            ],
            SubjectCategory::Technical => &[
                Subject::ComputerStudies,
                Subject::BusinessStudies,
                Subject::Agriculture,
            ],
            SubjectCategory::Arts => &[Subject::ArtAndDesign, Subject::Music, Subject::HomeScience],
        }
    }
}

impl std::fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    Mathematics,
    Biology,
    Chemistry,
    Physics,
    English,
    Kiswahili,
    French,
    German,
    Geography,
    History,
    /// Christian Religious Education
    Cre,
    /// Islamic Religious Education
    Ire,
    ComputerStudies,
    BusinessStudies,
    Agriculture,
    ArtAndDesign,
    Music,
    HomeScience,
}

/// 小写名称 → 科目
static SUBJECTS_BY_NAME: phf::Map<&'static str, Subject> = phf_map! {
    "mathematics" => Subject::Mathematics,
    "maths" => Subject::Mathematics,
    "math" => Subject::Mathematics,
    "biology" => Subject::Biology,
    "chemistry" => Subject::Chemistry,
    "physics" => Subject::Physics,
    "english" => Subject::English,
    "kiswahili" => Subject::Kiswahili,
    "french" => Subject::French,
    "german" => Subject::German,
    "geography" => Subject::Geography,
    "history" => Subject::History,
    "cre" => Subject::Cre,
    "ire" => Subject::Ire,
    "computer studies" => Subject::ComputerStudies,
    "business studies" => Subject::BusinessStudies,
    "agriculture" => Subject::Agriculture,
    "art and design" => Subject::ArtAndDesign,
    "music" => Subject::Music,
    "home science" => Subject::HomeScience,
};

impl Subject {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::Biology => "Biology",
            Subject::Chemistry => "Chemistry",
            Subject::Physics => "Physics",
            Subject::English => "English",
            Subject::Kiswahili => "Kiswahili",
            Subject::French => "French",
            Subject::German => "German",
            Subject::Geography => "Geography",
            Subject::History => "History",
            Subject::Cre => "CRE",
            Subject::Ire => "IRE",
            Subject::ComputerStudies => "Computer Studies",
            Subject::BusinessStudies => "Business Studies",
            Subject::Agriculture => "Agriculture",
            Subject::ArtAndDesign => "Art and Design",
            Subject::Music => "Music",
            Subject::HomeScience => "Home Science",
        }
    }

    /// 所属分类
    pub fn category(self) -> SubjectCategory {
        match self {
            Subject::Mathematics | Subject::Biology | Subject::Chemistry | Subject::Physics => {
                SubjectCategory::Sciences
            }
            Subject::English | Subject::Kiswahili | Subject::French | Subject::German => {
                SubjectCategory::Languages
            }
            Subject::Geography | Subject::History | Subject::Cre | Subject::Ire => {
                SubjectCategory::Humanities
            }
            Subject::ComputerStudies | Subject::BusinessStudies | Subject::Agriculture => {
                SubjectCategory::Technical
            }
            Subject::ArtAndDesign | Subject::Music | Subject::HomeScience => SubjectCategory::Arts,
        }
    }

    /// 是否分 Paper 1 / Paper 2
    pub fn has_papers(self) -> bool {
        matches!(
            self,
            Subject::Mathematics
                | Subject::English
                | Subject::Kiswahili
                | Subject::Biology
                | Subject::Chemistry
                | Subject::Physics
        )
    }

    /// 全部科目，按分类顺序
    pub fn all() -> impl Iterator<Item = Subject> {
        SubjectCategory::ALL
            .into_iter()
            .flat_map(|category| category.subjects().iter().copied())
    }

    /// 从名称解析科目（忽略大小写和首尾空白）
    pub fn find(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        SUBJECTS_BY_NAME.get(key.as_str()).copied()
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
