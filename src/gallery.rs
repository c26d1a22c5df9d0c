use crate::{
    domain::WallApi,
    embed::EmbedRef,
    layout,
    models::{Photo, PhotoId, PhotoKind},
};
use tracing;

/// How a card shows its photo.
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    Image { url: String },
    Embed(EmbedRef),
}

/// One polaroid in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCard {
    pub id: PhotoId,
    pub display: Display,
    pub caption: Option<String>,
    pub author: Option<String>,
    /// Cosmetic tilt in degrees.
    pub rotation: f64,
}

impl PhotoCard {
    /// Builds a card, or `None` when the photo has nothing to show.
    pub fn from_photo(photo: &Photo) -> Option<Self> {
        let reference = photo.reference()?;
        let caption = non_blank(photo.caption.as_deref());

        let display = match photo.kind() {
            PhotoKind::Instagram => match EmbedRef::instagram(reference) {
                Ok(embed) => Display::Embed(embed),
                Err(e) => {
                    tracing::warn!(photo_id = %photo.id, error = %e, "Skipping photo with unusable embed reference");
                    return None;
                }
            },
            PhotoKind::Image | PhotoKind::Unknown => Display::Image {
                url: reference.to_string(),
            },
        };

        Some(PhotoCard {
            id: photo.id.clone(),
            display,
            caption,
            author: non_blank(photo.created_by.as_deref()),
            rotation: layout::rotation_for(&photo.id),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    Loading,
    Empty,
    Rows(Vec<Vec<PhotoCard>>),
}

/// The photo grid: fetched once on mount, laid out by viewport width.
#[derive(Debug, Clone)]
pub struct Gallery {
    photos: Vec<Photo>,
    loading: bool,
    width: u32,
}

impl Gallery {
    /// A gallery that has not fetched yet; it renders as loading.
    pub fn new(width: u32) -> Self {
        Self {
            photos: Vec::new(),
            loading: true,
            width,
        }
    }

    /// Fetches the photo list. A failure is logged and the current list kept.
    pub async fn load(&mut self, api: &dyn WallApi) {
        self.loading = true;
        match api.list_photos().await {
            Ok(photos) => {
                tracing::info!("Gallery loaded {} photos", photos.len());
                self.photos = photos;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching images");
            }
        }
        self.loading = false;
    }

    pub fn resize(&mut self, width: u32) {
        if width != self.width {
            tracing::debug!(from = self.width, to = width, "Viewport resized");
        }
        self.width = width;
    }

    pub fn per_row(&self) -> usize {
        layout::per_row(self.width)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn find(&self, id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|photo| &photo.id == id)
    }

    /// Displayable cards in fetched order.
    pub fn cards(&self) -> Vec<PhotoCard> {
        self.photos.iter().filter_map(PhotoCard::from_photo).collect()
    }

    pub fn view(&self) -> GridView {
        if self.loading {
            return GridView::Loading;
        }
        let cards = self.cards();
        if cards.is_empty() {
            GridView::Empty
        } else {
            GridView::Rows(layout::chunk_rows(&cards, self.per_row()))
        }
    }
}
